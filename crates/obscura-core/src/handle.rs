//! # Ciphertext Handles
//!
//! Opaque references into the external encryption engine's state. A handle
//! is a capability token: holding one lets the ledger name a ciphertext in
//! engine calls, nothing more. The core never inspects what a handle points
//! at, and there is deliberately no method that yields plaintext.
//!
//! Handles are immutable. Every homomorphic operation returns a fresh
//! handle, so replacing a stored handle is the only way a balance changes.

use serde::{Deserialize, Serialize};

/// Handle to an encrypted 64-bit unsigned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedValue(u64);

/// Handle to an encrypted boolean predicate.
///
/// Produced by comparisons and consumed only by `select`. Never decrypted
/// inside the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedBool(u64);

impl EncryptedValue {
    /// Wrap an engine-issued handle number.
    ///
    /// Only encryption backends should mint handles.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The engine-issued handle number.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl EncryptedBool {
    /// Wrap an engine-issued predicate handle number.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The engine-issued predicate handle number.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EncryptedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ct:{}", self.0)
    }
}

impl std::fmt::Display for EncryptedBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cb:{}", self.0)
    }
}
