//! # Homomorphic Backend Trait
//!
//! Contract for the external homomorphic-encryption service. Handles are
//! minted by the backend; the ledger only passes them back in.
//!
//! Arithmetic is modulo 2^64 as in the underlying 64-bit ciphertext type.
//! Callers that need non-negative results must gate subtraction behind
//! [`FheBackend::ge`] and [`FheBackend::select`].

use obscura_core::{EncryptedBool, EncryptedValue, EngineError, ExternalCiphertext};

/// A homomorphic-encryption service operating on opaque handles.
///
/// Methods take `&mut self` because each call allocates a fresh handle.
/// Implementations fail only for handles they never issued.
pub trait FheBackend {
    /// Encrypt a public constant (used for encrypted zero).
    fn trivial_encrypt(&mut self, value: u64) -> Result<EncryptedValue, EngineError>;

    /// Accept a client-produced ciphertext.
    fn ingest(&mut self, ciphertext: &ExternalCiphertext) -> Result<EncryptedValue, EngineError>;

    /// Encrypted `a + b`.
    fn add(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError>;

    /// Encrypted `a - b`.
    fn sub(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError>;

    /// Encrypted predicate `a >= b`.
    fn ge(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedBool, EngineError>;

    /// Branchless `if predicate { if_true } else { if_false }`.
    fn select(
        &mut self,
        predicate: EncryptedBool,
        if_true: EncryptedValue,
        if_false: EncryptedValue,
    ) -> Result<EncryptedValue, EngineError>;
}

/// Plaintext release for a handle.
///
/// Held by disclosure oracles, never by the ledger. Returns `None` for
/// handles the backend does not know.
pub trait Decrypt {
    /// Decrypt the value behind `value`.
    fn decrypt(&self, value: EncryptedValue) -> Option<u64>;
}
