//! # Mock Homomorphic Backend
//!
//! A transparent stand-in for the external encryption service. Plaintexts
//! live in an arena; a handle is the arena index. Homomorphic operations
//! compute on the plaintexts and push the result as a new arena slot.
//!
//! ## External Ciphertext Format
//!
//! ```text
//! version (1 byte, 0x01) || nonce (16 bytes) || masked amount (8 bytes, LE)
//! mask = SHA256( "obscura-mock-fhe-v1" || key || nonce )[..8]
//! ```
//!
//! The mask keeps amounts off the wire in plaintext form, but the scheme is
//! a toy: anyone with the 32-byte key reads everything.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Use only in tests and local development.

use obscura_core::{
    EncryptedBool, EncryptedValue, EngineError, ExternalCiphertext, ImportContext, InputProof,
};
use obscura_zkp::MockInputProver;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::backend::{Decrypt, FheBackend};

const MASK_DOMAIN: &[u8] = b"obscura-mock-fhe-v1";
const VERSION: u8 = 0x01;
const NONCE_LEN: usize = 16;

/// Length of a mock external ciphertext in bytes.
pub const MOCK_CIPHERTEXT_LEN: usize = 1 + NONCE_LEN + 8;

fn mask(key: &[u8; 32], nonce: &[u8; NONCE_LEN]) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(MASK_DOMAIN);
    hasher.update(key);
    hasher.update(nonce);
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn xor8(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = x ^ y;
    }
    out
}

/// Plaintext-backed arena implementing [`FheBackend`] and [`Decrypt`].
#[derive(Debug, Clone)]
pub struct MockFheBackend {
    key: [u8; 32],
    values: Vec<u64>,
    predicates: Vec<bool>,
}

/// Client-side encryptor sharing the backend's key.
#[derive(Debug, Clone)]
pub struct MockClient {
    key: [u8; 32],
}

impl MockFheBackend {
    /// Create a backend with a fresh random key.
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self::with_key(key)
    }

    /// Create a backend with a fixed key.
    pub fn with_key(key: [u8; 32]) -> Self {
        Self {
            key,
            values: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// A client that produces ciphertexts this backend can ingest.
    pub fn client(&self) -> MockClient {
        MockClient { key: self.key }
    }

    /// Number of value handles issued so far.
    pub fn handle_count(&self) -> usize {
        self.values.len()
    }

    fn value(&self, handle: EncryptedValue) -> Result<u64, EngineError> {
        usize::try_from(handle.raw())
            .ok()
            .and_then(|idx| self.values.get(idx).copied())
            .ok_or(EngineError::UnknownHandle(handle.raw()))
    }

    fn predicate(&self, handle: EncryptedBool) -> Result<bool, EngineError> {
        usize::try_from(handle.raw())
            .ok()
            .and_then(|idx| self.predicates.get(idx).copied())
            .ok_or(EngineError::UnknownPredicate(handle.raw()))
    }

    fn push_value(&mut self, value: u64) -> EncryptedValue {
        self.values.push(value);
        EncryptedValue::from_raw((self.values.len() - 1) as u64)
    }

    fn push_predicate(&mut self, value: bool) -> EncryptedBool {
        self.predicates.push(value);
        EncryptedBool::from_raw((self.predicates.len() - 1) as u64)
    }
}

impl FheBackend for MockFheBackend {
    fn trivial_encrypt(&mut self, value: u64) -> Result<EncryptedValue, EngineError> {
        Ok(self.push_value(value))
    }

    fn ingest(&mut self, ciphertext: &ExternalCiphertext) -> Result<EncryptedValue, EngineError> {
        let bytes = ciphertext.as_bytes();
        if bytes.len() != MOCK_CIPHERTEXT_LEN {
            return Err(EngineError::MalformedCiphertext(format!(
                "expected {MOCK_CIPHERTEXT_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0] != VERSION {
            return Err(EngineError::MalformedCiphertext(format!(
                "unsupported ciphertext version {:#04x}",
                bytes[0]
            )));
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[1..1 + NONCE_LEN]);
        let mut masked = [0u8; 8];
        masked.copy_from_slice(&bytes[1 + NONCE_LEN..]);
        let amount = u64::from_le_bytes(xor8(masked, mask(&self.key, &nonce)));
        Ok(self.push_value(amount))
    }

    fn add(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError> {
        let sum = self.value(a)?.wrapping_add(self.value(b)?);
        Ok(self.push_value(sum))
    }

    fn sub(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedValue, EngineError> {
        let diff = self.value(a)?.wrapping_sub(self.value(b)?);
        Ok(self.push_value(diff))
    }

    fn ge(&mut self, a: EncryptedValue, b: EncryptedValue) -> Result<EncryptedBool, EngineError> {
        let holds = self.value(a)? >= self.value(b)?;
        Ok(self.push_predicate(holds))
    }

    fn select(
        &mut self,
        predicate: EncryptedBool,
        if_true: EncryptedValue,
        if_false: EncryptedValue,
    ) -> Result<EncryptedValue, EngineError> {
        // Read both operands before looking at the predicate.
        let t = self.value(if_true)?;
        let f = self.value(if_false)?;
        let chosen = if self.predicate(predicate)? { t } else { f };
        Ok(self.push_value(chosen))
    }
}

impl Decrypt for MockFheBackend {
    fn decrypt(&self, value: EncryptedValue) -> Option<u64> {
        self.value(value).ok()
    }
}

impl MockClient {
    /// Encrypt `amount` under a random nonce.
    pub fn encrypt(&self, amount: u64) -> ExternalCiphertext {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        self.encrypt_with_nonce(amount, nonce)
    }

    /// Encrypt `amount` under a caller-chosen nonce.
    pub fn encrypt_with_nonce(&self, amount: u64, nonce: [u8; NONCE_LEN]) -> ExternalCiphertext {
        let masked = xor8(amount.to_le_bytes(), mask(&self.key, &nonce));
        let mut bytes = Vec::with_capacity(MOCK_CIPHERTEXT_LEN);
        bytes.push(VERSION);
        bytes.extend_from_slice(&nonce);
        bytes.extend_from_slice(&masked);
        ExternalCiphertext::new(bytes)
    }

    /// Encrypt `amount` and prove it for `ctx`.
    pub fn encrypt_input(&self, amount: u64, ctx: &ImportContext) -> (ExternalCiphertext, InputProof) {
        let ciphertext = self.encrypt(amount);
        let proof = MockInputProver.prove(&ciphertext, ctx);
        (ciphertext, proof)
    }
}
