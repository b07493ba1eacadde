//! # Input Verifier Trait
//!
//! The ledger never decides on its own whether a submitted ciphertext is
//! well-formed or whether the submitter is entitled to use it. It asks an
//! [`InputVerifier`].

use obscura_core::{ExternalCiphertext, ImportContext, InputProof};
use thiserror::Error;

use crate::policy::ProofBackend;

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

/// Verifies that an external ciphertext is bound to an import context.
///
/// Implementations must be deterministic and side-effect free from the
/// ledger's point of view.
pub trait InputVerifier: Send + Sync {
    /// Which proof backend this verifier speaks for.
    fn backend(&self) -> ProofBackend;

    /// Verify `proof` over `ciphertext` for `ctx`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the proof binds the ciphertext to `ctx.sender` and
    /// `ctx.ledger`, `Ok(false)` if it is well-formed but does not.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`] if the proof cannot be decoded.
    fn verify(
        &self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
        ctx: &ImportContext,
    ) -> Result<bool, VerifyError>;
}

impl<V: InputVerifier + ?Sized> InputVerifier for Box<V> {
    fn backend(&self) -> ProofBackend {
        (**self).backend()
    }

    fn verify(
        &self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
        ctx: &ImportContext,
    ) -> Result<bool, VerifyError> {
        (**self).verify(ciphertext, proof, ctx)
    }
}
