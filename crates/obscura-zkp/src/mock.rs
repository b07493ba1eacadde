//! # Mock Input Proofs
//!
//! A deterministic, transparent stand-in for the external input-proof
//! system. The "proof" for a ciphertext is a domain-separated SHA-256
//! digest over the ledger, the sender and the ciphertext bytes:
//!
//! ```text
//! proof = SHA256( "obscura-input-proof-v1" || ledger || sender || ciphertext )
//! ```
//!
//! Verification recomputes the digest for the context the ledger supplies,
//! so a proof produced for one sender or ledger fails for any other.
//!
//! ## Security Warning
//!
//! **NOT ZERO-KNOWLEDGE.** Anyone holding the ciphertext can forge a proof
//! for any context. This backend exists for tests and local development and
//! is refused by [`ProofPolicy::production`](crate::ProofPolicy::production).

use obscura_core::{ExternalCiphertext, ImportContext, InputProof};
use sha2::{Digest, Sha256};

use crate::policy::ProofBackend;
use crate::traits::{InputVerifier, VerifyError};

const DOMAIN: &[u8] = b"obscura-input-proof-v1";

/// Length of a mock proof in bytes.
pub const MOCK_PROOF_LEN: usize = 32;

/// Produces mock proofs on behalf of clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockInputProver;

/// Checks mock proofs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockInputVerifier;

fn binding_digest(ciphertext: &ExternalCiphertext, ctx: &ImportContext) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(ctx.ledger.as_bytes());
    hasher.update(ctx.sender.as_bytes());
    hasher.update(ciphertext.as_bytes());
    hasher.finalize().into()
}

impl MockInputProver {
    /// Prove that `ciphertext` is submitted by `ctx.sender` to `ctx.ledger`.
    pub fn prove(&self, ciphertext: &ExternalCiphertext, ctx: &ImportContext) -> InputProof {
        InputProof::new(binding_digest(ciphertext, ctx).to_vec())
    }
}

impl InputVerifier for MockInputVerifier {
    fn backend(&self) -> ProofBackend {
        ProofBackend::Mock
    }

    fn verify(
        &self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
        ctx: &ImportContext,
    ) -> Result<bool, VerifyError> {
        if proof.as_bytes().len() != MOCK_PROOF_LEN {
            return Err(VerifyError::MalformedProof(format!(
                "mock proof must be {MOCK_PROOF_LEN} bytes, got {}",
                proof.as_bytes().len()
            )));
        }
        let expected = binding_digest(ciphertext, ctx);
        let valid = proof.as_bytes() == expected.as_slice();
        if !valid {
            tracing::debug!(sender = %ctx.sender, ledger = %ctx.ledger, "mock input proof does not bind");
        }
        Ok(valid)
    }
}
