//! # Transaction Processor
//!
//! The state-changing operations of [`ConfidentialLedger`]. Each one runs the
//! same pipeline:
//!
//! 1. boundary checks (authority, registration, null principals),
//! 2. verify and import the client ciphertext,
//! 3. compute every candidate handle through the engine,
//! 4. one staged commit.
//!
//! Steps 1 and 2 are the only places an operation can fail. Sufficiency is
//! decided by an encrypted predicate inside step 3 and never becomes an
//! error, a log line or a metric label.

use obscura_core::{
    EncryptedValue, ExternalCiphertext, InputProof, LedgerError, LedgerEvent, Principal,
};
use obscura_fhe::FheBackend;
use obscura_zkp::InputVerifier;

use crate::ledger::ConfidentialLedger;
use crate::staging::StagedUpdate;

impl<B: FheBackend, V: InputVerifier> ConfidentialLedger<B, V> {
    // ─── Issuance ───────────────────────────────────────────────────────

    /// Credit (mint) `amount` to `account`. Authority only.
    ///
    /// Registers `account` on first credit. Balance and total supply grow by
    /// the same encrypted amount. Emits [`LedgerEvent::Mint`].
    ///
    /// Total supply is bounded by `u64::MAX`. A credit that would carry the
    /// supply past it leaves balance and supply unchanged, selected the same
    /// branchless way as an insufficient transfer, and still succeeds. Every
    /// balance is at most the supply, so gating on the supply covers the
    /// balance too.
    ///
    /// # Errors
    ///
    /// `Unauthorized` (checked first), `ZeroAddress`, `InvalidProof`,
    /// `ProofPolicy`.
    pub fn credit(
        &mut self,
        caller: Principal,
        account: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        let result = self.apply_credit(caller, account, amount, proof);
        observe("credit", &result);
        result
    }

    fn apply_credit(
        &mut self,
        caller: Principal,
        account: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        self.authority.require(caller)?;
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress { role: "account" });
        }
        let ctx = self.import_context(caller);
        let amount = self.engine.import_external(amount, proof, &ctx)?;

        let mut update = StagedUpdate::default();
        let balance = self.balance_or_register(account, &mut update)?;
        let supply = self.operand(self.accounts.supply());

        let grown_supply = self.engine.add(supply, amount)?;
        let in_range = self.engine.compare_greater_or_equal(grown_supply, supply)?;
        let grown_balance = self.engine.add(balance, amount)?;
        let new_balance = self.engine.select(in_range, grown_balance, balance)?;
        let new_supply = self.engine.select(in_range, grown_supply, supply)?;

        update.set_balance(account, new_balance);
        update.set_supply(new_supply);
        update.emit(LedgerEvent::Mint {
            to: account,
            authority: caller,
        });
        self.commit(update)
    }

    // ─── Movement ───────────────────────────────────────────────────────

    /// Move `amount` from `caller` to `to` if the caller can cover it.
    ///
    /// When the caller cannot, the operation still succeeds, both balances
    /// keep their plaintext values, and the same [`LedgerEvent::Transfer`]
    /// is emitted. Registers `to` if needed. A transfer to oneself leaves the
    /// balance unchanged.
    ///
    /// # Errors
    ///
    /// `NotRegistered` for the caller (checked first), `ZeroAddress` for the
    /// recipient, `InvalidProof`, `ProofPolicy`.
    pub fn transfer_confidential(
        &mut self,
        caller: Principal,
        to: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        let result = self.apply_transfer(caller, to, amount, proof);
        observe("transfer", &result);
        result
    }

    fn apply_transfer(
        &mut self,
        caller: Principal,
        to: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        let from_balance = self
            .accounts
            .get(caller)
            .ok_or(LedgerError::NotRegistered { account: caller })?;
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress { role: "recipient" });
        }
        let ctx = self.import_context(caller);
        let amount = self.engine.import_external(amount, proof, &ctx)?;

        let mut update = StagedUpdate::default();
        let from_balance = self.operand(from_balance);

        let sufficient = self.engine.compare_greater_or_equal(from_balance, amount)?;
        let debited = self.engine.sub(from_balance, amount)?;
        let new_from = self.engine.select(sufficient, debited, from_balance)?;

        // Self-transfer credits back onto the debited leg.
        let to_base = if to == caller {
            new_from
        } else {
            self.balance_or_register(to, &mut update)?
        };
        let credited = self.engine.add(to_base, amount)?;
        let new_to = self.engine.select(sufficient, credited, to_base)?;

        update.set_balance(caller, new_from);
        update.set_balance(to, new_to);
        update.emit(LedgerEvent::Transfer { from: caller, to });
        self.commit(update)
    }

    /// Burn `amount` from the caller's balance and total supply together,
    /// if the caller can cover it. Otherwise a silent no-op. No event.
    ///
    /// # Errors
    ///
    /// `NotRegistered`, `InvalidProof`, `ProofPolicy`.
    pub fn debit(
        &mut self,
        caller: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        let result = self.apply_debit(caller, amount, proof);
        observe("debit", &result);
        result
    }

    fn apply_debit(
        &mut self,
        caller: Principal,
        amount: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), LedgerError> {
        let balance = self
            .accounts
            .get(caller)
            .ok_or(LedgerError::NotRegistered { account: caller })?;
        let ctx = self.import_context(caller);
        let amount = self.engine.import_external(amount, proof, &ctx)?;

        let balance = self.operand(balance);
        let supply = self.operand(self.accounts.supply());

        let sufficient = self.engine.compare_greater_or_equal(balance, amount)?;
        let debited = self.engine.sub(balance, amount)?;
        let new_balance = self.engine.select(sufficient, debited, balance)?;
        let burned = self.engine.sub(supply, amount)?;
        let new_supply = self.engine.select(sufficient, burned, supply)?;

        let mut update = StagedUpdate::default();
        update.set_balance(caller, new_balance);
        update.set_supply(new_supply);
        self.commit(update)
    }

    // ─── Administration ─────────────────────────────────────────────────

    /// Hand the issuing authority to `new_authority`.
    ///
    /// The new authority can disclose total supply immediately. Existing
    /// balances need [`grant_merchant_access`](Self::grant_merchant_access).
    /// Emits [`LedgerEvent::AuthorityTransferred`].
    ///
    /// # Errors
    ///
    /// `Unauthorized` (checked first), `ZeroAddress`, `AuthorityIsLedger`
    /// when the new authority is the ledger's own principal.
    pub fn transfer_authority(
        &mut self,
        caller: Principal,
        new_authority: Principal,
    ) -> Result<(), LedgerError> {
        let result = self.apply_authority_transfer(caller, new_authority);
        observe("transfer_authority", &result);
        result
    }

    fn apply_authority_transfer(
        &mut self,
        caller: Principal,
        new_authority: Principal,
    ) -> Result<(), LedgerError> {
        self.authority.require(caller)?;
        if new_authority == self.id {
            return Err(LedgerError::AuthorityIsLedger {
                principal: new_authority,
            });
        }
        let previous = self
            .authority
            .transfer(caller, new_authority, &mut self.acl, &self.accounts)?;
        self.events.push(LedgerEvent::AuthorityTransferred {
            previous,
            new: new_authority,
        });
        Ok(())
    }

    /// Grant the current authority disclosure on `account`'s existing
    /// balance. Authority only.
    pub fn grant_merchant_access(
        &mut self,
        caller: Principal,
        account: Principal,
    ) -> Result<(), LedgerError> {
        let result = self
            .authority
            .backfill_account_access(caller, account, &mut self.acl, &self.accounts)
            .map(|_| ());
        observe("grant_merchant_access", &result);
        result
    }

    // ─── Helpers ────────────────────────────────────────────────────────

    /// The account's stored balance, or a fresh encrypted zero staged as its
    /// opening balance.
    fn balance_or_register(
        &mut self,
        account: Principal,
        update: &mut StagedUpdate,
    ) -> Result<EncryptedValue, LedgerError> {
        if let Some(balance) = self.accounts.get(account) {
            return Ok(self.operand(balance));
        }
        if let Some(zero) = update.registered_zero(account) {
            return Ok(zero);
        }
        let zero = self.engine.zero()?;
        update.register(account, zero);
        Ok(zero)
    }
}

/// Record the outcome of one operation. Amounts and sufficiency are not
/// available here and must never be added.
fn observe(op: &'static str, result: &Result<(), LedgerError>) {
    match result {
        Ok(()) => {
            metrics::counter!("obscura_operations_total", "op" => op).increment(1);
            tracing::info!(op, "operation applied");
        }
        Err(e) => {
            metrics::counter!("obscura_rejections_total", "op" => op, "reason" => e.kind())
                .increment(1);
            tracing::warn!(op, reason = e.kind(), error = %e, "operation rejected");
        }
    }
}
