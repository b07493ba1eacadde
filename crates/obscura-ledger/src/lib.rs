//! # obscura-ledger: Confidential Ledger
//!
//! A ledger of encrypted per-account balances. Amounts enter as client
//! ciphertexts, are combined homomorphically, and are never seen in
//! plaintext by the ledger. Only the account holder and the issuing
//! authority are ever granted disclosure of a balance.
//!
//! ## Operations
//!
//! | Operation | Caller | Event |
//! |---|---|---|
//! | [`credit`](ConfidentialLedger::credit) | authority | `Mint` |
//! | [`transfer_confidential`](ConfidentialLedger::transfer_confidential) | registered account | `Transfer` |
//! | [`debit`](ConfidentialLedger::debit) | registered account | none |
//! | [`transfer_authority`](ConfidentialLedger::transfer_authority) | authority | `AuthorityTransferred` |
//! | [`grant_merchant_access`](ConfidentialLedger::grant_merchant_access) | authority | none |
//!
//! ## Branchless Sufficiency
//!
//! Transfers and debits never fail for lack of funds. Both outcomes are
//! computed and an encrypted predicate selects between them, so a transfer
//! the sender could not afford completes, emits the same event, and leaves
//! both balances where they were. Nothing observable distinguishes it from
//! one that moved value.
//!
//! ## Atomicity
//!
//! Every operation validates, imports and computes first, then applies a
//! single staged commit. A boundary error (`ZeroAddress`, `Unauthorized`,
//! `NotRegistered`, `InvalidProof`) therefore leaves accounts, supply,
//! grants and the event log exactly as they were.

pub mod config;
pub mod disclosure;
pub mod event;
pub mod ledger;
pub mod processor;

mod staging;

pub use config::{ConfigError, LedgerConfig};
pub use disclosure::{DisclosureError, DisclosureKey, DisclosureOracle, DisclosureRequest};
pub use event::{EventLog, EventRecord};
pub use ledger::ConfidentialLedger;
