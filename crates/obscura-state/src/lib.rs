//! # obscura-state: Ledger State
//!
//! The three pieces of state a confidential ledger owns, each kept apart so
//! that the only coupling between them is explicit:
//!
//! - **Access control** (`acl.rs`): an append-only table of
//!   `(handle, principal)` disclosure grants. There is no revoke; rights
//!   change only because balances move to new handles.
//!
//! - **Accounts** (`accounts.rs`): principal → current balance handle, with a
//!   one-way `Unregistered → Registered` lifecycle, plus the total-supply
//!   handle.
//!
//! - **Authority** (`authority.rs`): the single issuer principal and its
//!   transfer protocol. Takes the grant table and accounts by reference;
//!   nothing here is global.
//!
//! None of these types check who is calling except [`RoleAuthority`], whose
//! whole job is that check. Authorization for ledger operations happens in
//! the transaction processor before it calls in.

pub mod accounts;
pub mod acl;
pub mod authority;

pub use accounts::{Account, AccountLedger, AccountState};
pub use acl::AccessControlRegistry;
pub use authority::RoleAuthority;
