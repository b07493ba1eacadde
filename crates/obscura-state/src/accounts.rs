//! # Account Ledger
//!
//! Maps principals to their current encrypted balance handle and holds the
//! encrypted total-supply singleton.
//!
//! ## States
//!
//! ```text
//! Unregistered ──(first credit / first incoming transfer)──▶ Registered
//! ```
//!
//! One-way; there is no deregistration. A registered account always holds a
//! valid balance handle, possibly an encryption of zero. An unregistered
//! account has no entry at all.
//!
//! No method here checks who is calling.

use std::collections::BTreeMap;

use obscura_core::{EncryptedValue, LedgerError, Principal};
use serde::{Deserialize, Serialize};

/// Registration state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountState {
    /// No entry exists.
    Unregistered,
    /// The account holds a balance handle.
    Registered,
}

impl AccountState {
    /// Whether the account exists.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unregistered => f.write_str("UNREGISTERED"),
            Self::Registered => f.write_str("REGISTERED"),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account holder.
    pub address: Principal,
    /// Always `true` for stored entries.
    pub registered: bool,
    /// Current balance handle.
    pub balance: EncryptedValue,
}

/// Principal → balance handle, plus total supply.
#[derive(Debug, Clone)]
pub struct AccountLedger {
    accounts: BTreeMap<Principal, Account>,
    supply: EncryptedValue,
}

impl AccountLedger {
    /// A ledger with no accounts and the given encrypted-zero supply.
    pub fn new(initial_supply: EncryptedValue) -> Self {
        Self {
            accounts: BTreeMap::new(),
            supply: initial_supply,
        }
    }

    /// Current balance handle, if registered.
    pub fn get(&self, account: Principal) -> Option<EncryptedValue> {
        self.accounts.get(&account).map(|a| a.balance)
    }

    /// The stored account entry, if registered.
    pub fn account(&self, account: Principal) -> Option<&Account> {
        self.accounts.get(&account)
    }

    /// Whether `account` has an entry.
    pub fn is_registered(&self, account: Principal) -> bool {
        self.accounts.contains_key(&account)
    }

    /// Registration state of `account`.
    pub fn state(&self, account: Principal) -> AccountState {
        if self.is_registered(account) {
            AccountState::Registered
        } else {
            AccountState::Unregistered
        }
    }

    /// Register `account` with `zero` as its balance if it has no entry.
    ///
    /// Returns the account's balance handle: `zero` on first registration,
    /// the existing handle on every later call.
    pub fn ensure_registered(&mut self, account: Principal, zero: EncryptedValue) -> EncryptedValue {
        self.accounts
            .entry(account)
            .or_insert_with(|| {
                tracing::debug!(account = %account, "account registered");
                Account {
                    address: account,
                    registered: true,
                    balance: zero,
                }
            })
            .balance
    }

    /// Replace the balance handle of a registered account.
    pub fn set_balance(&mut self, account: Principal, value: EncryptedValue) -> Result<(), LedgerError> {
        match self.accounts.get_mut(&account) {
            Some(entry) => {
                entry.balance = value;
                Ok(())
            }
            None => Err(LedgerError::NotRegistered { account }),
        }
    }

    /// Current total-supply handle.
    pub fn supply(&self) -> EncryptedValue {
        self.supply
    }

    /// Replace the total-supply handle.
    pub fn set_supply(&mut self, value: EncryptedValue) {
        self.supply = value;
    }

    /// Registered accounts in address order.
    pub fn registered_accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account is registered.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
