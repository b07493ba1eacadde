//! # Issuing Authority
//!
//! Holds the single principal allowed to credit accounts and to administer
//! disclosure grants, and the protocol for handing that role over.
//!
//! Handing the role over grants the new authority disclosure on the current
//! total supply only. Existing account balances are not touched: the new
//! authority gains visibility into an account when the balance next moves
//! (every mutation grants the authority of the moment) or when the authority
//! backfills access explicitly with
//! [`RoleAuthority::backfill_account_access`].

use obscura_core::{EncryptedValue, LedgerError, Principal};

use crate::accounts::AccountLedger;
use crate::acl::AccessControlRegistry;

/// The issuer role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAuthority {
    current: Principal,
}

impl RoleAuthority {
    /// Install `initial` as the authority.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ZeroAddress`] if `initial` is the null principal.
    pub fn new(initial: Principal) -> Result<Self, LedgerError> {
        if initial.is_zero() {
            return Err(LedgerError::ZeroAddress { role: "authority" });
        }
        Ok(Self { current: initial })
    }

    /// The current authority.
    pub fn current(&self) -> Principal {
        self.current
    }

    /// Fail with [`LedgerError::Unauthorized`] unless `caller` is the authority.
    pub fn require(&self, caller: Principal) -> Result<(), LedgerError> {
        if caller == self.current {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized { caller })
        }
    }

    /// Hand the role from `caller` to `new_authority`.
    ///
    /// Grants `new_authority` disclosure on the current total supply and
    /// returns the previous authority.
    pub fn transfer(
        &mut self,
        caller: Principal,
        new_authority: Principal,
        acl: &mut AccessControlRegistry,
        accounts: &AccountLedger,
    ) -> Result<Principal, LedgerError> {
        self.require(caller)?;
        if new_authority.is_zero() {
            return Err(LedgerError::ZeroAddress {
                role: "new authority",
            });
        }
        let previous = std::mem::replace(&mut self.current, new_authority);
        acl.grant(accounts.supply(), new_authority);
        tracing::info!(previous = %previous, new = %new_authority, "authority transferred");
        Ok(previous)
    }

    /// Grant the current authority disclosure on `account`'s existing
    /// balance handle. Returns that handle.
    pub fn backfill_account_access(
        &self,
        caller: Principal,
        account: Principal,
        acl: &mut AccessControlRegistry,
        accounts: &AccountLedger,
    ) -> Result<EncryptedValue, LedgerError> {
        self.require(caller)?;
        let balance = accounts
            .get(account)
            .ok_or(LedgerError::NotRegistered { account })?;
        acl.grant(balance, self.current);
        tracing::debug!(account = %account, authority = %self.current, "authority access backfilled");
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(b: u8) -> Principal {
        Principal::from_bytes([b; 20])
    }

    fn h(id: u64) -> EncryptedValue {
        EncryptedValue::from_raw(id)
    }

    #[test]
    fn test_zero_authority_rejected() {
        assert_eq!(
            RoleAuthority::new(Principal::ZERO),
            Err(LedgerError::ZeroAddress { role: "authority" })
        );
    }

    #[test]
    fn test_require() {
        let auth = RoleAuthority::new(p(1)).unwrap();
        assert!(auth.require(p(1)).is_ok());
        assert_eq!(
            auth.require(p(2)),
            Err(LedgerError::Unauthorized { caller: p(2) })
        );
    }

    #[test]
    fn test_transfer_grants_supply_only() {
        let mut auth = RoleAuthority::new(p(1)).unwrap();
        let mut acl = AccessControlRegistry::new();
        let mut accounts = AccountLedger::new(h(0));
        accounts.ensure_registered(p(5), h(1));

        let previous = auth.transfer(p(1), p(2), &mut acl, &accounts).unwrap();
        assert_eq!(previous, p(1));
        assert_eq!(auth.current(), p(2));
        assert!(acl.is_authorized(h(0), p(2)));
        assert!(!acl.is_authorized(h(1), p(2)));
    }

    #[test]
    fn test_transfer_by_non_authority_rejected() {
        let mut auth = RoleAuthority::new(p(1)).unwrap();
        let mut acl = AccessControlRegistry::new();
        let accounts = AccountLedger::new(h(0));
        let err = auth.transfer(p(3), p(2), &mut acl, &accounts).unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized { caller: p(3) });
        assert_eq!(auth.current(), p(1));
        assert!(acl.is_empty());
    }

    #[test]
    fn test_transfer_to_zero_rejected() {
        let mut auth = RoleAuthority::new(p(1)).unwrap();
        let mut acl = AccessControlRegistry::new();
        let accounts = AccountLedger::new(h(0));
        let err = auth
            .transfer(p(1), Principal::ZERO, &mut acl, &accounts)
            .unwrap_err();
        assert!(matches!(err, LedgerError::ZeroAddress { .. }));
        assert_eq!(auth.current(), p(1));
    }

    #[test]
    fn test_backfill_grants_current_authority() {
        let auth = RoleAuthority::new(p(1)).unwrap();
        let mut acl = AccessControlRegistry::new();
        let mut accounts = AccountLedger::new(h(0));
        accounts.ensure_registered(p(5), h(7));
        assert_eq!(
            auth.backfill_account_access(p(1), p(5), &mut acl, &accounts),
            Ok(h(7))
        );
        assert!(acl.is_authorized(h(7), p(1)));
    }

    #[test]
    fn test_backfill_checks_caller_and_registration() {
        let auth = RoleAuthority::new(p(1)).unwrap();
        let mut acl = AccessControlRegistry::new();
        let accounts = AccountLedger::new(h(0));
        assert!(matches!(
            auth.backfill_account_access(p(2), p(5), &mut acl, &accounts),
            Err(LedgerError::Unauthorized { .. })
        ));
        assert_eq!(
            auth.backfill_account_access(p(1), p(5), &mut acl, &accounts),
            Err(LedgerError::NotRegistered { account: p(5) })
        );
        assert!(acl.is_empty());
    }
}
