//! # External Inputs
//!
//! What a caller hands the ledger when it wants to move value: a ciphertext
//! encrypted outside the ledger, plus a proof that binds that ciphertext to
//! the submitting sender and to this ledger instance. The ledger treats both
//! as opaque byte strings and hands them to the verifier and the engine.

use serde::{Deserialize, Serialize};

use crate::hex;
use crate::identity::Principal;

/// A ciphertext produced by a client outside the ledger.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCiphertext(pub Vec<u8>);

/// A proof binding an [`ExternalCiphertext`] to an [`ImportContext`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

/// The binding a submitted ciphertext must be proven against.
///
/// A proof produced for one sender (or one ledger) must not verify for any
/// other, otherwise a ciphertext observed on the wire could be replayed by a
/// different account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContext {
    /// The ledger instance receiving the input.
    pub ledger: Principal,
    /// The principal submitting the input.
    pub sender: Principal,
}

impl ExternalCiphertext {
    /// Wrap raw ciphertext bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl InputProof {
    /// Wrap raw proof bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw proof bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ImportContext {
    /// Context for an input submitted by `sender` to `ledger`.
    pub fn new(ledger: Principal, sender: Principal) -> Self {
        Self { ledger, sender }
    }
}

// Ciphertexts and proofs are long; Debug shows a short prefix only.

impl std::fmt::Debug for ExternalCiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = &self.0[..self.0.len().min(4)];
        write!(f, "ExternalCiphertext({}..., {} bytes)", hex::encode(prefix), self.0.len())
    }
}

impl std::fmt::Debug for InputProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = &self.0[..self.0.len().min(4)];
        write!(f, "InputProof({}..., {} bytes)", hex::encode(prefix), self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_truncated() {
        let ct = ExternalCiphertext::new(vec![0xaa; 25]);
        let s = format!("{ct:?}");
        assert_eq!(s, "ExternalCiphertext(aaaaaaaa..., 25 bytes)");
    }

    #[test]
    fn test_debug_handles_short_input() {
        let proof = InputProof::new(vec![0x01]);
        assert_eq!(format!("{proof:?}"), "InputProof(01..., 1 bytes)");
    }
}
