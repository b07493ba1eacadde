//! # Ledger Events
//!
//! Observable announcements emitted by state-changing operations. Events
//! carry addresses only. A transfer that silently did nothing because the
//! sender lacked funds emits exactly the same `Transfer` event as one that
//! moved value.

use serde::{Deserialize, Serialize};

use crate::identity::Principal;

/// An event emitted by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// The authority credited (minted to) an account.
    Mint {
        /// The credited account.
        to: Principal,
        /// The authority that performed the credit.
        authority: Principal,
    },
    /// A confidential transfer was processed.
    Transfer {
        /// The sending account.
        from: Principal,
        /// The receiving account.
        to: Principal,
    },
    /// The issuing authority role changed hands.
    AuthorityTransferred {
        /// The outgoing authority.
        previous: Principal,
        /// The incoming authority.
        new: Principal,
    },
}

impl LedgerEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Transfer { .. } => "transfer",
            Self::AuthorityTransferred { .. } => "authority_transferred",
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mint { to, authority } => write!(f, "MINT {to} by {authority}"),
            Self::Transfer { from, to } => write!(f, "TRANSFER {from} -> {to}"),
            Self::AuthorityTransferred { previous, new } => {
                write!(f, "AUTHORITY {previous} -> {new}")
            }
        }
    }
}
