//! # Confidential Ledger State
//!
//! [`ConfidentialLedger`] owns every piece of ledger state: the encrypted
//! value engine, the grant table, the account table with total supply, the
//! issuing authority and the event log. The operations themselves live in
//! [`processor`](crate::processor); this module holds construction, reads
//! and the staged commit they all end in.
//!
//! ## Security Invariant
//!
//! Every handle stored in the account table or as total supply is granted
//! to the ledger's own principal in the same commit that stores it, so the
//! next operation may use it as an operand.

use obscura_core::{EncryptedValue, ImportContext, LedgerError, Principal};
use obscura_fhe::{Decrypt, EncryptedValueEngine, FheBackend};
use obscura_state::{AccessControlRegistry, AccountLedger, RoleAuthority};
use obscura_zkp::InputVerifier;

use crate::config::LedgerConfig;
use crate::disclosure::DisclosureOracle;
use crate::event::EventLog;
use crate::staging::StagedUpdate;

/// A single confidential ledger instance.
#[derive(Debug)]
pub struct ConfidentialLedger<B, V> {
    pub(crate) id: Principal,
    pub(crate) engine: EncryptedValueEngine<B, V>,
    pub(crate) acl: AccessControlRegistry,
    pub(crate) accounts: AccountLedger,
    pub(crate) authority: RoleAuthority,
    pub(crate) events: EventLog,
}

impl<B: FheBackend, V: InputVerifier> ConfidentialLedger<B, V> {
    /// Build a ledger with no accounts and an encrypted-zero total supply.
    ///
    /// The opening supply is granted to the ledger itself and to the
    /// initial authority.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ZeroAddress`] if either the ledger principal or the
    /// authority is null, [`LedgerError::AuthorityIsLedger`] if they are the
    /// same principal.
    pub fn new(config: &LedgerConfig, backend: B, verifier: V) -> Result<Self, LedgerError> {
        if config.ledger_principal.is_zero() {
            return Err(LedgerError::ZeroAddress { role: "ledger" });
        }
        let authority = RoleAuthority::new(config.authority)?;
        if config.authority == config.ledger_principal {
            return Err(LedgerError::AuthorityIsLedger {
                principal: config.authority,
            });
        }
        let mut engine = EncryptedValueEngine::new(backend, verifier, config.proof_policy);
        let supply = engine.zero()?;

        let mut acl = AccessControlRegistry::new();
        acl.grant_all(supply, [config.ledger_principal, authority.current()]);

        tracing::info!(
            ledger = %config.ledger_principal,
            authority = %authority.current(),
            policy = %config.proof_policy.mode(),
            "confidential ledger initialised"
        );

        Ok(Self {
            id: config.ledger_principal,
            engine,
            acl,
            accounts: AccountLedger::new(supply),
            authority,
            events: EventLog::new(),
        })
    }

    /// Current balance handle of `account`, or `None` if unregistered.
    pub fn read_balance_handle(&self, account: Principal) -> Option<EncryptedValue> {
        self.accounts.get(account)
    }

    /// Current total-supply handle.
    pub fn read_supply_handle(&self) -> EncryptedValue {
        self.accounts.supply()
    }

    /// The current issuing authority.
    pub fn authority(&self) -> Principal {
        self.authority.current()
    }

    /// This ledger's own principal.
    pub fn ledger_principal(&self) -> Principal {
        self.id
    }

    /// Events emitted so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The disclosure grant table.
    pub fn acl(&self) -> &AccessControlRegistry {
        &self.acl
    }

    /// The account table.
    pub fn accounts(&self) -> &AccountLedger {
        &self.accounts
    }

    /// The encrypted value engine.
    pub fn engine(&self) -> &EncryptedValueEngine<B, V> {
        &self.engine
    }

    /// The context a client must bind its input proof to when `caller`
    /// submits to this ledger.
    pub fn import_context(&self, caller: Principal) -> ImportContext {
        ImportContext::new(self.id, caller)
    }

    /// A stored handle about to be used as an operand.
    pub(crate) fn operand(&self, handle: EncryptedValue) -> EncryptedValue {
        debug_assert!(
            self.acl.is_authorized(handle, self.id),
            "stored handle {handle} was never granted to the ledger"
        );
        handle
    }

    /// Apply a staged update.
    ///
    /// Every target is checked before anything is written, so this either
    /// applies the whole batch or nothing.
    pub(crate) fn commit(&mut self, update: StagedUpdate) -> Result<(), LedgerError> {
        if let Some(account) = update.balances.keys().copied().find(|account| {
            !self.accounts.is_registered(*account) && update.registered_zero(*account).is_none()
        }) {
            return Err(LedgerError::NotRegistered { account });
        }

        let authority = self.authority.current();
        for (&account, &zero) in &update.registrations {
            self.accounts.ensure_registered(account, zero);
            self.acl.grant_all(zero, [self.id, account, authority]);
        }
        for (&account, &balance) in &update.balances {
            self.accounts.set_balance(account, balance)?;
            self.acl.grant_all(balance, [self.id, account, authority]);
        }
        if let Some(supply) = update.supply {
            self.accounts.set_supply(supply);
            self.acl.grant_all(supply, [self.id, authority]);
        }
        if let Some(event) = update.event {
            self.events.push(event);
        }
        Ok(())
    }
}

impl<B: FheBackend + Decrypt, V: InputVerifier> ConfidentialLedger<B, V> {
    /// A disclosure oracle over this ledger's grants, decrypting through
    /// the co-located backend.
    pub fn disclosure_oracle(&self) -> DisclosureOracle<'_, B> {
        DisclosureOracle::new(self.id, &self.acl, self.engine.backend())
    }
}
