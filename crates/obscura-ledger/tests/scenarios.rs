//! # Confidential Ledger Scenarios
//!
//! End-to-end walks through the ledger with the mock encryption backend and
//! the mock proof verifier. Plaintext is read back through the disclosure
//! oracle, signed by the principal that should (or should not) be allowed to
//! see it.

use obscura_core::{
    EncryptedValue, ExternalCiphertext, InputProof, LedgerError, LedgerEvent, Principal,
};
use obscura_fhe::{Decrypt, MockFheBackend};
use obscura_ledger::{ConfidentialLedger, DisclosureError, DisclosureKey, LedgerConfig};
use obscura_zkp::{MockInputVerifier, ProofPolicy};

type Ledger = ConfidentialLedger<MockFheBackend, MockInputVerifier>;

const LEDGER: Principal = Principal([0xee; 20]);

/// Principals in these tests are backed by disclosure keys so they can sign
/// disclosure requests.
struct Party {
    key: DisclosureKey,
}

impl Party {
    fn new(seed: u8) -> Self {
        Self {
            key: DisclosureKey::from_seed(&[seed; 32]),
        }
    }

    fn id(&self) -> Principal {
        self.key.principal()
    }

    fn read(&self, ledger: &Ledger, handle: EncryptedValue) -> Result<u64, DisclosureError> {
        let request = self.key.sign_request(handle, ledger.ledger_principal());
        ledger.disclosure_oracle().disclose(&request)
    }

    fn balance(&self, ledger: &Ledger, account: &Party) -> Result<u64, DisclosureError> {
        let handle = ledger
            .read_balance_handle(account.id())
            .expect("account should be registered");
        self.read(ledger, handle)
    }

    fn supply(&self, ledger: &Ledger) -> Result<u64, DisclosureError> {
        self.read(ledger, ledger.read_supply_handle())
    }
}

fn new_ledger(authority: &Party) -> Ledger {
    let config = LedgerConfig::new(LEDGER, authority.id()).with_proof_policy(ProofPolicy::development());
    ConfidentialLedger::new(&config, MockFheBackend::with_key([7; 32]), MockInputVerifier)
        .expect("ledger construction should succeed")
}

fn input(ledger: &Ledger, sender: &Party, amount: u64) -> (ExternalCiphertext, InputProof) {
    let ctx = ledger.import_context(sender.id());
    ledger.engine().backend().client().encrypt_input(amount, &ctx)
}

fn credit(ledger: &mut Ledger, authority: &Party, to: &Party, amount: u64) {
    let (ct, proof) = input(ledger, authority, amount);
    ledger
        .credit(authority.id(), to.id(), &ct, &proof)
        .expect("credit should succeed");
}

fn transfer(ledger: &mut Ledger, from: &Party, to: &Party, amount: u64) {
    let (ct, proof) = input(ledger, from, amount);
    ledger
        .transfer_confidential(from.id(), to.id(), &ct, &proof)
        .expect("transfer should succeed");
}

fn plain(ledger: &Ledger, account: &Party) -> u64 {
    let handle = ledger.read_balance_handle(account.id()).unwrap();
    ledger.engine().backend().decrypt(handle).unwrap()
}

fn plain_supply(ledger: &Ledger) -> u64 {
    ledger.engine().backend().decrypt(ledger.read_supply_handle()).unwrap()
}

// ─── The five walkthrough scenarios ─────────────────────────────────────

#[test]
fn walkthrough_credit_transfer_debit_and_handover() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);
    let carol = Party::new(4);
    let mut ledger = new_ledger(&issuer);

    // 1. credit 100 to A
    credit(&mut ledger, &issuer, &alice, 100);
    assert!(ledger.accounts().is_registered(alice.id()));
    assert_eq!(alice.balance(&ledger, &alice), Ok(100));
    assert_eq!(issuer.supply(&ledger), Ok(100));

    // 2. A sends 30 to unregistered B
    assert!(!ledger.accounts().is_registered(bob.id()));
    transfer(&mut ledger, &alice, &bob, 30);
    assert!(ledger.accounts().is_registered(bob.id()));
    assert_eq!(alice.balance(&ledger, &alice), Ok(70));
    assert_eq!(bob.balance(&ledger, &bob), Ok(30));
    assert_eq!(issuer.supply(&ledger), Ok(100));

    // 3. A tries to send 1000
    transfer(&mut ledger, &alice, &bob, 1000);
    assert_eq!(alice.balance(&ledger, &alice), Ok(70));
    assert_eq!(bob.balance(&ledger, &bob), Ok(30));
    assert_eq!(issuer.supply(&ledger), Ok(100));

    // 4. A burns 70
    let (ct, proof) = input(&ledger, &alice, 70);
    ledger.debit(alice.id(), &ct, &proof).unwrap();
    assert_eq!(alice.balance(&ledger, &alice), Ok(0));
    assert_eq!(issuer.supply(&ledger), Ok(30));

    // 5. role handed to C
    ledger.transfer_authority(issuer.id(), carol.id()).unwrap();
    assert_eq!(carol.supply(&ledger), Ok(30));
    assert!(matches!(
        carol.balance(&ledger, &alice),
        Err(DisclosureError::Unauthorized { .. })
    ));
    ledger.grant_merchant_access(carol.id(), alice.id()).unwrap();
    assert_eq!(carol.balance(&ledger, &alice), Ok(0));
}

// ─── Disclosure authorization ───────────────────────────────────────────

#[test]
fn only_holder_and_authority_can_disclose_a_balance() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 12);
    credit(&mut ledger, &issuer, &bob, 5);

    assert_eq!(alice.balance(&ledger, &alice), Ok(12));
    assert_eq!(issuer.balance(&ledger, &alice), Ok(12));
    assert!(matches!(
        bob.balance(&ledger, &alice),
        Err(DisclosureError::Unauthorized { .. })
    ));
    assert!(matches!(
        alice.supply(&ledger),
        Err(DisclosureError::Unauthorized { .. })
    ));
}

#[test]
fn previous_authority_keeps_old_grants_but_not_new_ones() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let carol = Party::new(4);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 10);
    let old_handle = ledger.read_balance_handle(alice.id()).unwrap();

    ledger.transfer_authority(issuer.id(), carol.id()).unwrap();
    credit(&mut ledger, &carol, &alice, 1);

    assert_eq!(issuer.read(&ledger, old_handle), Ok(10));
    assert!(issuer.balance(&ledger, &alice).is_err());
    // Mutation under the new authority grants it without a backfill.
    assert_eq!(carol.balance(&ledger, &alice), Ok(11));
}

// ─── Registration ───────────────────────────────────────────────────────

#[test]
fn second_credit_does_not_reset_balance() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 40);
    credit(&mut ledger, &issuer, &alice, 2);
    assert_eq!(plain(&ledger, &alice), 42);
    assert_eq!(ledger.accounts().len(), 1);
}

// ─── Atomicity ──────────────────────────────────────────────────────────

#[test]
fn invalid_proof_changes_nothing() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 50);

    let balance_before = ledger.read_balance_handle(alice.id());
    let supply_before = ledger.read_supply_handle();
    let grants_before = ledger.acl().len();
    let events_before = ledger.events().len();

    let (ct, _) = input(&ledger, &alice, 10);
    let bogus = InputProof::new(vec![0u8; 32]);
    let err = ledger
        .transfer_confidential(alice.id(), bob.id(), &ct, &bogus)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidProof(_)));

    assert_eq!(ledger.read_balance_handle(alice.id()), balance_before);
    assert_eq!(ledger.read_supply_handle(), supply_before);
    assert!(!ledger.accounts().is_registered(bob.id()));
    assert_eq!(ledger.acl().len(), grants_before);
    assert_eq!(ledger.events().len(), events_before);
    assert_eq!(plain(&ledger, &alice), 50);
}

#[test]
fn proof_is_bound_to_its_sender() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 50);
    credit(&mut ledger, &issuer, &bob, 50);

    // Bob replays a ciphertext and proof Alice produced for herself.
    let (ct, proof) = input(&ledger, &alice, 10);
    let err = ledger
        .transfer_confidential(bob.id(), alice.id(), &ct, &proof)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidProof(_)));
    assert_eq!(plain(&ledger, &alice), 50);
    assert_eq!(plain(&ledger, &bob), 50);
}

#[test]
fn proof_is_bound_to_its_ledger() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let mut ledger = new_ledger(&issuer);

    let other = ledger.import_context(issuer.id());
    let foreign = obscura_core::ImportContext::new(Principal([0xdd; 20]), other.sender);
    let (ct, proof) = ledger.engine().backend().client().encrypt_input(5, &foreign);
    let err = ledger.credit(issuer.id(), alice.id(), &ct, &proof).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidProof(_)));
    assert!(ledger.accounts().is_empty());
}

#[test]
fn production_policy_refuses_mock_proofs() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let config = LedgerConfig::new(LEDGER, issuer.id()).with_proof_policy(ProofPolicy::production());
    let mut ledger: Ledger =
        ConfidentialLedger::new(&config, MockFheBackend::with_key([7; 32]), MockInputVerifier).unwrap();

    let (ct, proof) = input(&ledger, &issuer, 5);
    let err = ledger.credit(issuer.id(), alice.id(), &ct, &proof).unwrap_err();
    assert!(matches!(err, LedgerError::ProofPolicy(_)));
    assert_eq!(err.kind(), "proof_policy");
    assert!(ledger.accounts().is_empty());
    assert_eq!(plain_supply(&ledger), 0);
}

#[test]
fn malformed_ciphertext_is_rejected_before_any_write() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let mut ledger = new_ledger(&issuer);

    let ct = ExternalCiphertext::new(vec![0xff; 3]);
    let proof = obscura_zkp::MockInputProver.prove(&ct, &ledger.import_context(issuer.id()));
    let err = ledger.credit(issuer.id(), alice.id(), &ct, &proof).unwrap_err();
    assert!(matches!(err, LedgerError::Engine(_)));
    assert!(ledger.accounts().is_empty());
    assert!(ledger.events().is_empty());
}

// ─── Boundary error ordering ────────────────────────────────────────────

#[test]
fn boundary_errors_are_reported_in_order() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let mallory = Party::new(9);
    let mut ledger = new_ledger(&issuer);

    let (ct, proof) = input(&ledger, &mallory, 5);
    assert_eq!(
        ledger.credit(mallory.id(), alice.id(), &ct, &proof),
        Err(LedgerError::Unauthorized { caller: mallory.id() })
    );
    assert_eq!(
        ledger.debit(mallory.id(), &ct, &proof),
        Err(LedgerError::NotRegistered { account: mallory.id() })
    );
    assert_eq!(
        ledger.grant_merchant_access(mallory.id(), alice.id()),
        Err(LedgerError::Unauthorized { caller: mallory.id() })
    );
    assert_eq!(
        ledger.grant_merchant_access(issuer.id(), alice.id()),
        Err(LedgerError::NotRegistered { account: alice.id() })
    );
    assert_eq!(
        ledger.transfer_authority(issuer.id(), Principal::ZERO),
        Err(LedgerError::ZeroAddress { role: "new authority" })
    );
    assert_eq!(ledger.authority(), issuer.id());
    assert!(ledger.events().is_empty());
}

// ─── Sufficiency is unobservable ────────────────────────────────────────

#[test]
fn insufficient_transfer_looks_like_a_sufficient_one() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);

    let run = |amount: u64| {
        let mut ledger = new_ledger(&issuer);
        credit(&mut ledger, &issuer, &alice, 20);
        let (ct, proof) = input(&ledger, &alice, amount);
        let result = ledger.transfer_confidential(alice.id(), bob.id(), &ct, &proof);
        let event = ledger.events().last().map(|r| r.event);
        let grants = ledger.acl().len();
        let registered = ledger.accounts().len();
        (result, event, grants, registered, plain(&ledger, &alice))
    };

    let (ok_result, ok_event, ok_grants, ok_registered, ok_left) = run(5);
    let (no_result, no_event, no_grants, no_registered, no_left) = run(500);

    assert_eq!(ok_result, Ok(()));
    assert_eq!(no_result, Ok(()));
    assert_eq!(ok_event, no_event);
    assert_eq!(
        ok_event,
        Some(LedgerEvent::Transfer {
            from: alice.id(),
            to: bob.id()
        })
    );
    assert_eq!(ok_grants, no_grants);
    assert_eq!(ok_registered, no_registered);
    assert_eq!((ok_left, no_left), (15, 20));
}

#[test]
fn self_transfer_leaves_balance_and_supply_alone() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 8);
    transfer(&mut ledger, &alice, &alice, 3);
    transfer(&mut ledger, &alice, &alice, 80);
    assert_eq!(plain(&ledger, &alice), 8);
    assert_eq!(plain_supply(&ledger), 8);
    assert_eq!(ledger.accounts().len(), 1);
}

#[test]
fn event_log_records_mints_and_transfers_in_order() {
    let issuer = Party::new(1);
    let alice = Party::new(2);
    let bob = Party::new(3);
    let mut ledger = new_ledger(&issuer);
    credit(&mut ledger, &issuer, &alice, 10);
    transfer(&mut ledger, &alice, &bob, 4);
    let (ct, proof) = input(&ledger, &bob, 1);
    ledger.debit(bob.id(), &ct, &proof).unwrap();

    let kinds: Vec<_> = ledger.events().records().iter().map(|r| r.event.name()).collect();
    assert_eq!(kinds, vec!["mint", "transfer"]);
    assert_eq!(
        ledger.events().records()[0].event,
        LedgerEvent::Mint {
            to: alice.id(),
            authority: issuer.id()
        }
    );
}
