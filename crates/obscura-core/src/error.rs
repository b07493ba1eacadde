//! # Error Types: Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `LedgerError` is the boundary taxonomy. Every variant is detected before
//!   any state is written, so returning one means nothing changed.
//! - `EngineError` covers the encryption engine wrapper. An engine-level
//!   `InvalidProof` surfaces to callers as `LedgerError::InvalidProof`.
//! - Insufficient balance is not an error anywhere in this hierarchy.

use thiserror::Error;

use crate::identity::Principal;

/// Boundary failures of ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The null principal was supplied where a real account is required.
    #[error("null principal supplied as {role}")]
    ZeroAddress {
        /// Which argument was null (e.g. "recipient").
        role: &'static str,
    },

    /// The caller is not the current authority.
    #[error("caller {caller} is not the issuing authority")]
    Unauthorized {
        /// The rejected caller.
        caller: Principal,
    },

    /// The operation requires an account that does not exist yet.
    #[error("account {account} is not registered")]
    NotRegistered {
        /// The missing account.
        account: Principal,
    },

    /// The ledger's own principal was named as issuing authority. The ledger
    /// holds a grant on every handle it stores, so an authority sharing its
    /// principal would keep disclosure after handing the role over.
    #[error("{principal} is the ledger's own principal and cannot be the authority")]
    AuthorityIsLedger {
        /// The rejected principal.
        principal: Principal,
    },

    /// The submitted ciphertext/proof pair failed verification.
    #[error("invalid input proof: {0}")]
    InvalidProof(String),

    /// The configured proof policy refuses the verifier in use.
    #[error("proof policy violation: {0}")]
    ProofPolicy(String),

    /// The encryption engine rejected an operation.
    #[error("engine error: {0}")]
    Engine(EngineError),
}

/// Failures of the encryption engine wrapper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A value handle the backend never issued.
    #[error("unknown ciphertext handle {0}")]
    UnknownHandle(u64),

    /// A predicate handle the backend never issued.
    #[error("unknown predicate handle {0}")]
    UnknownPredicate(u64),

    /// The external ciphertext could not be decoded.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The proof did not bind the ciphertext to the claimed context.
    #[error("invalid input proof: {0}")]
    InvalidProof(String),

    /// The proof policy refuses the verifier backend.
    #[error("proof policy violation: {0}")]
    ProofPolicy(String),
}

impl From<EngineError> for LedgerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidProof(reason) => LedgerError::InvalidProof(reason),
            EngineError::ProofPolicy(reason) => LedgerError::ProofPolicy(reason),
            other => LedgerError::Engine(other),
        }
    }
}

impl LedgerError {
    /// Stable short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ZeroAddress { .. } => "zero_address",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotRegistered { .. } => "not_registered",
            Self::AuthorityIsLedger { .. } => "authority_is_ledger",
            Self::InvalidProof(_) => "invalid_proof",
            Self::ProofPolicy(_) => "proof_policy",
            Self::Engine(_) => "engine",
        }
    }
}
