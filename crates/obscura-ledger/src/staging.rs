//! Staged writes for a single ledger operation.
//!
//! Operations collect every write here while they compute, then hand the
//! whole batch to the ledger's commit. Nothing touches accounts, grants or
//! events until the batch is complete.

use std::collections::BTreeMap;

use obscura_core::{EncryptedValue, LedgerEvent, Principal};

#[derive(Debug, Default)]
pub(crate) struct StagedUpdate {
    /// Accounts to register, with their encrypted-zero opening balance.
    pub(crate) registrations: BTreeMap<Principal, EncryptedValue>,
    /// Final balance handle per account. A later write for the same
    /// account replaces an earlier one.
    pub(crate) balances: BTreeMap<Principal, EncryptedValue>,
    pub(crate) supply: Option<EncryptedValue>,
    pub(crate) event: Option<LedgerEvent>,
}

impl StagedUpdate {
    pub(crate) fn register(&mut self, account: Principal, zero: EncryptedValue) {
        self.registrations.entry(account).or_insert(zero);
    }

    /// Opening balance of an account registered earlier in this batch.
    pub(crate) fn registered_zero(&self, account: Principal) -> Option<EncryptedValue> {
        self.registrations.get(&account).copied()
    }

    pub(crate) fn set_balance(&mut self, account: Principal, value: EncryptedValue) {
        self.balances.insert(account, value);
    }

    pub(crate) fn set_supply(&mut self, value: EncryptedValue) {
        self.supply = Some(value);
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.event = Some(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_balance_write_wins() {
        let a = Principal::from_bytes([1; 20]);
        let mut update = StagedUpdate::default();
        update.set_balance(a, EncryptedValue::from_raw(1));
        update.set_balance(a, EncryptedValue::from_raw(2));
        assert_eq!(update.balances.len(), 1);
        assert_eq!(update.balances[&a], EncryptedValue::from_raw(2));
    }

    #[test]
    fn test_first_registration_sticks() {
        let a = Principal::from_bytes([1; 20]);
        let mut update = StagedUpdate::default();
        update.register(a, EncryptedValue::from_raw(5));
        update.register(a, EncryptedValue::from_raw(6));
        assert_eq!(update.registered_zero(a), Some(EncryptedValue::from_raw(5)));
    }
}
