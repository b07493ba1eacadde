//! # Run Subcommand
//!
//! Executes a scripted scenario against a fresh in-process ledger backed by
//! the mock encryption service and the mock proof verifier.
//!
//! ```yaml
//! ledger_principal: "0x00000000000000000000000000000000000000ee"
//! authority: issuer
//! proof_policy: development
//! parties:
//!   issuer: 1
//!   alice: 2
//! steps:
//!   - op: credit
//!     caller: issuer
//!     to: alice
//!     amount: 100
//!   - op: disclose
//!     requester: alice
//!     account: alice
//! ```
//!
//! Each party is an Ed25519 disclosure key derived from a one-byte seed; its
//! principal is derived from the public key. Ledger rejections are recorded
//! in the report and do not stop the run. Unknown party names do.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use obscura_core::{EncryptedValue, LedgerError, Principal};
use obscura_fhe::MockFheBackend;
use obscura_ledger::{ConfidentialLedger, DisclosureKey, EventRecord, LedgerConfig};
use obscura_zkp::{MockInputVerifier, ProofPolicy};
use serde::{Deserialize, Serialize};

/// Arguments for the run subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the scenario file (YAML).
    pub scenario: PathBuf,
}

// ─── Scenario format ────────────────────────────────────────────────────

/// A scripted run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// The ledger's own principal.
    pub ledger_principal: Principal,
    /// Name of the party that starts as issuing authority.
    pub authority: String,
    /// Proof policy; follows the environment when omitted.
    #[serde(default)]
    pub proof_policy: Option<ProofPolicy>,
    /// Party name to key seed byte.
    pub parties: BTreeMap<String, u8>,
    /// Steps, executed in order.
    pub steps: Vec<Step>,
}

/// One scenario step. Party fields name entries of `parties`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Authority mints `amount` to `to`.
    Credit {
        caller: String,
        to: String,
        amount: u64,
    },
    /// `from` sends `amount` to `to`.
    Transfer {
        from: String,
        to: String,
        amount: u64,
    },
    /// `from` burns `amount`.
    Debit { from: String, amount: u64 },
    /// `caller` hands the authority role to `to`.
    TransferAuthority { caller: String, to: String },
    /// `caller` backfills authority access on `account`.
    GrantAccess { caller: String, account: String },
    /// `requester` asks the oracle for `account`'s balance, or for total
    /// supply when `account` is omitted.
    Disclose {
        requester: String,
        #[serde(default)]
        account: Option<String>,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Credit { .. } => "credit",
            Self::Transfer { .. } => "transfer",
            Self::Debit { .. } => "debit",
            Self::TransferAuthority { .. } => "transfer_authority",
            Self::GrantAccess { .. } => "grant_access",
            Self::Disclose { .. } => "disclose",
        }
    }
}

impl Scenario {
    /// Parse a scenario from YAML.
    pub fn from_yaml_str(input: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(input).context("scenario is not valid YAML")
    }

    /// Load a scenario file.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("in {}", path.display()))
    }
}

// ─── Report ─────────────────────────────────────────────────────────────

/// What a step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The ledger accepted the operation.
    Applied,
    /// The ledger refused the operation.
    Rejected { reason: String, error: String },
    /// The oracle released a plaintext.
    Disclosed { value: u64 },
    /// The oracle refused.
    Refused { error: String },
}

/// One executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Zero-based step index.
    pub index: usize,
    /// Step kind.
    pub op: &'static str,
    /// Result.
    pub outcome: Outcome,
}

/// A registered account at the end of the run.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Party name, if the account belongs to a named party.
    pub party: Option<String>,
    /// Account principal.
    pub address: Principal,
    /// Final balance handle.
    pub balance: EncryptedValue,
    /// Principals that may disclose the final balance.
    pub readers: Vec<Principal>,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// The ledger's principal.
    pub ledger: Principal,
    /// Authority at the end of the run.
    pub authority: Principal,
    /// Proof policy the ledger enforced.
    pub proof_policy: ProofPolicy,
    /// Final total-supply handle.
    pub supply: EncryptedValue,
    /// Per-step outcomes.
    pub steps: Vec<StepReport>,
    /// Emitted events.
    pub events: Vec<EventRecord>,
    /// Registered accounts.
    pub accounts: Vec<AccountSummary>,
}

// ─── Execution ──────────────────────────────────────────────────────────

type Ledger = ConfidentialLedger<MockFheBackend, MockInputVerifier>;

struct Parties {
    keys: BTreeMap<String, DisclosureKey>,
}

impl Parties {
    fn new(seeds: &BTreeMap<String, u8>) -> Self {
        let keys = seeds
            .iter()
            .map(|(name, seed)| (name.clone(), DisclosureKey::from_seed(&[*seed; 32])))
            .collect();
        Self { keys }
    }

    fn key(&self, name: &str) -> anyhow::Result<&DisclosureKey> {
        match self.keys.get(name) {
            Some(key) => Ok(key),
            None => bail!("unknown party {name:?}"),
        }
    }

    fn principal(&self, name: &str) -> anyhow::Result<Principal> {
        Ok(self.key(name)?.principal())
    }

    fn name_of(&self, principal: Principal) -> Option<String> {
        self.keys
            .iter()
            .find(|(_, key)| key.principal() == principal)
            .map(|(name, _)| name.clone())
    }
}

/// Load and run the scenario named by `args`.
pub fn execute(args: &RunArgs) -> anyhow::Result<ScenarioReport> {
    let scenario = Scenario::load(&args.scenario)?;
    run(&scenario)
}

/// Run `scenario` against a fresh ledger.
pub fn run(scenario: &Scenario) -> anyhow::Result<ScenarioReport> {
    let parties = Parties::new(&scenario.parties);
    let mut config = LedgerConfig::new(
        scenario.ledger_principal,
        parties.principal(&scenario.authority)?,
    );
    if let Some(policy) = scenario.proof_policy {
        config = config.with_proof_policy(policy);
    }
    config.validate()?;

    let mut ledger: Ledger =
        ConfidentialLedger::new(&config, MockFheBackend::generate(), MockInputVerifier)?;

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let outcome = run_step(&mut ledger, &parties, step)
            .with_context(|| format!("step {index} ({})", step.name()))?;
        tracing::debug!(index, op = step.name(), outcome = ?outcome, "step finished");
        steps.push(StepReport {
            index,
            op: step.name(),
            outcome,
        });
    }

    let accounts = ledger
        .accounts()
        .registered_accounts()
        .map(|account| AccountSummary {
            party: parties.name_of(account.address),
            address: account.address,
            balance: account.balance,
            readers: ledger.acl().authorized_principals(account.balance).collect(),
        })
        .collect();

    Ok(ScenarioReport {
        ledger: ledger.ledger_principal(),
        authority: ledger.authority(),
        proof_policy: ledger.engine().policy(),
        supply: ledger.read_supply_handle(),
        steps,
        events: ledger.events().records().to_vec(),
        accounts,
    })
}

fn run_step(ledger: &mut Ledger, parties: &Parties, step: &Step) -> anyhow::Result<Outcome> {
    let client = ledger.engine().backend().client();
    let result = match step {
        Step::Credit { caller, to, amount } => {
            let caller = parties.principal(caller)?;
            let (ct, proof) = client.encrypt_input(*amount, &ledger.import_context(caller));
            ledger.credit(caller, parties.principal(to)?, &ct, &proof)
        }
        Step::Transfer { from, to, amount } => {
            let from = parties.principal(from)?;
            let (ct, proof) = client.encrypt_input(*amount, &ledger.import_context(from));
            ledger.transfer_confidential(from, parties.principal(to)?, &ct, &proof)
        }
        Step::Debit { from, amount } => {
            let from = parties.principal(from)?;
            let (ct, proof) = client.encrypt_input(*amount, &ledger.import_context(from));
            ledger.debit(from, &ct, &proof)
        }
        Step::TransferAuthority { caller, to } => {
            ledger.transfer_authority(parties.principal(caller)?, parties.principal(to)?)
        }
        Step::GrantAccess { caller, account } => {
            ledger.grant_merchant_access(parties.principal(caller)?, parties.principal(account)?)
        }
        Step::Disclose { requester, account } => {
            return disclose(ledger, parties, requester, account.as_deref());
        }
    };
    Ok(ledger_outcome(result))
}

fn ledger_outcome(result: Result<(), LedgerError>) -> Outcome {
    match result {
        Ok(()) => Outcome::Applied,
        Err(e) => Outcome::Rejected {
            reason: e.kind().to_string(),
            error: e.to_string(),
        },
    }
}

fn disclose(
    ledger: &Ledger,
    parties: &Parties,
    requester: &str,
    account: Option<&str>,
) -> anyhow::Result<Outcome> {
    let key = parties.key(requester)?;
    let handle = match account {
        None => ledger.read_supply_handle(),
        Some(name) => match ledger.read_balance_handle(parties.principal(name)?) {
            Some(handle) => handle,
            None => {
                return Ok(Outcome::Refused {
                    error: format!("{name} has no account"),
                })
            }
        },
    };
    let request = key.sign_request(handle, ledger.ledger_principal());
    Ok(match ledger.disclosure_oracle().disclose(&request) {
        Ok(value) => Outcome::Disclosed { value },
        Err(e) => Outcome::Refused {
            error: e.to_string(),
        },
    })
}
