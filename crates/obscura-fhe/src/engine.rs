//! # Encrypted Value Engine
//!
//! The capability wrapper the ledger owns. It pairs a [`FheBackend`] with an
//! [`InputVerifier`] and a [`ProofPolicy`], so the only path from client
//! bytes to a usable handle is: policy check, proof verification, ingest.
//!
//! Arithmetic calls pass straight through to the backend. The engine keeps
//! no cache and no record of the handles it returned.

use obscura_core::{
    EncryptedBool, EncryptedValue, EngineError, ExternalCiphertext, ImportContext, InputProof,
};
use obscura_zkp::{InputVerifier, ProofPolicy};

use crate::backend::FheBackend;

/// Backend + verifier + policy, owned by a single ledger instance.
#[derive(Debug)]
pub struct EncryptedValueEngine<B, V> {
    backend: B,
    verifier: V,
    policy: ProofPolicy,
}

impl<B: FheBackend, V: InputVerifier> EncryptedValueEngine<B, V> {
    /// Assemble an engine.
    pub fn new(backend: B, verifier: V, policy: ProofPolicy) -> Self {
        Self {
            backend,
            verifier,
            policy,
        }
    }

    /// Validate and import a client ciphertext into a fresh handle.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ProofPolicy`] if the policy refuses the verifier.
    /// - [`EngineError::InvalidProof`] if the proof is malformed or does not
    ///   bind the ciphertext to `ctx`.
    /// - [`EngineError::MalformedCiphertext`] if the backend cannot decode
    ///   the ciphertext.
    pub fn import_external(
        &mut self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
        ctx: &ImportContext,
    ) -> Result<EncryptedValue, EngineError> {
        self.policy
            .validate(self.verifier.backend())
            .map_err(|e| EngineError::ProofPolicy(e.to_string()))?;

        match self.verifier.verify(ciphertext, proof, ctx) {
            Ok(true) => {}
            Ok(false) => {
                return Err(EngineError::InvalidProof(format!(
                    "proof does not bind ciphertext to sender {} on ledger {}",
                    ctx.sender, ctx.ledger
                )));
            }
            Err(e) => return Err(EngineError::InvalidProof(e.to_string())),
        }

        let handle = self.backend.ingest(ciphertext)?;
        tracing::debug!(handle = %handle, sender = %ctx.sender, "external ciphertext imported");
        Ok(handle)
    }

    /// A fresh encryption of zero.
    pub fn zero(&mut self) -> Result<EncryptedValue, EngineError> {
        self.backend.trivial_encrypt(0)
    }

    /// Encrypted `a + b`.
    pub fn add(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError> {
        self.backend.add(a, b)
    }

    /// Encrypted `a - b` (wrapping).
    pub fn sub(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError> {
        self.backend.sub(a, b)
    }

    /// Encrypted predicate `a >= b`.
    pub fn compare_greater_or_equal(
        &mut self,
        a: EncryptedValue,
        b: EncryptedValue,
    ) -> Result<EncryptedBool, EngineError> {
        self.backend.ge(a, b)
    }

    /// Branchless select on an encrypted predicate.
    pub fn select(
        &mut self,
        predicate: EncryptedBool,
        if_true: EncryptedValue,
        if_false: EncryptedValue,
    ) -> Result<EncryptedValue, EngineError> {
        self.backend.select(predicate, if_true, if_false)
    }

    /// The proof policy in force.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    /// Shared access to the backend (e.g. for a co-located disclosure oracle).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::backend::Decrypt;
    use crate::mock::MockFheBackend;
    use obscura_core::Principal;
    use obscura_zkp::MockInputVerifier;

    fn ctx(sender: u8) -> ImportContext {
        ImportContext::new(Principal::from_bytes([0xee; 20]), Principal::from_bytes([sender; 20]))
    }

    fn engine(policy: ProofPolicy) -> EncryptedValueEngine<MockFheBackend, MockInputVerifier> {
        EncryptedValueEngine::new(MockFheBackend::with_key([1u8; 32]), MockInputVerifier, policy)
    }

    #[test]
    fn test_import_with_valid_proof() {
        let mut e = engine(ProofPolicy::development());
        let (ct, proof) = e.backend().client().encrypt_input(500, &ctx(1));
        let h = e.import_external(&ct, &proof, &ctx(1)).unwrap();
        assert_eq!(e.backend().decrypt(h), Some(500));
    }

    #[test]
    fn test_import_rejects_proof_for_other_sender() {
        let mut e = engine(ProofPolicy::development());
        let (ct, proof) = e.backend().client().encrypt_input(500, &ctx(1));
        let before = e.backend().handle_count();
        let err = e.import_external(&ct, &proof, &ctx(2)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidProof(_)));
        assert_eq!(e.backend().handle_count(), before);
    }

    #[test]
    fn test_import_maps_malformed_proof_to_invalid_proof() {
        let mut e = engine(ProofPolicy::development());
        let ct = e.backend().client().encrypt(5);
        let err = e
            .import_external(&ct, &InputProof::new(vec![1, 2]), &ctx(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidProof(msg) if msg.contains("malformed")));
    }

    #[test]
    fn test_production_policy_refuses_mock_verifier() {
        let mut e = engine(ProofPolicy::production());
        let (ct, proof) = e.backend().client().encrypt_input(5, &ctx(1));
        let err = e.import_external(&ct, &proof, &ctx(1)).unwrap_err();
        assert!(matches!(err, EngineError::ProofPolicy(_)));
    }

    #[test]
    fn test_arithmetic_passthrough() {
        let mut e = engine(ProofPolicy::development());
        let zero = e.zero().unwrap();
        let (ct, proof) = e.backend().client().encrypt_input(8, &ctx(1));
        let eight = e.import_external(&ct, &proof, &ctx(1)).unwrap();
        let sum = e.add(zero, eight).unwrap();
        let enough = e.compare_greater_or_equal(zero, eight).unwrap();
        let chosen = e.select(enough, zero, sum).unwrap();
        let back = e.sub(chosen, eight).unwrap();
        assert_eq!(e.backend().decrypt(chosen), Some(8));
        assert_eq!(e.backend().decrypt(back), Some(0));
    }
}
