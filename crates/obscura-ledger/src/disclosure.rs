//! # Disclosure Oracle
//!
//! Reference implementation of the out-of-band collaborator that releases
//! plaintext to authorized principals. The ledger never calls it; it only
//! reads the ledger's grant table.
//!
//! ## Request Format
//!
//! A request names a handle and carries the requester's Ed25519 public key
//! and a signature over:
//!
//! ```text
//! "obscura-disclosure-v1" || handle (u64 little-endian) || ledger principal (20 bytes)
//! ```
//!
//! Binding the ledger principal stops a request signed for one ledger from
//! being replayed against another. The requesting principal is derived from
//! the public key with [`Principal::from_public_key`].
//!
//! ## Security Invariant
//!
//! - The oracle decrypts only after the signature verifies AND the derived
//!   principal holds a grant on the exact handle requested.
//! - Signing keys are never serialized or logged. `DisclosureKey` does not
//!   implement `Serialize` and its `Debug` output omits the key.

use ed25519_dalek::{Signer, Verifier};
use obscura_core::{EncryptedValue, Principal};
use obscura_fhe::Decrypt;
use obscura_state::AccessControlRegistry;
use thiserror::Error;

const DOMAIN_TAG: &[u8] = b"obscura-disclosure-v1";

/// Errors returned by [`DisclosureOracle::disclose`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisclosureError {
    /// The public key or signature is invalid.
    #[error("bad disclosure signature: {0}")]
    BadSignature(String),

    /// The requester holds no grant on the handle.
    #[error("{requester} is not authorized to disclose {handle}")]
    Unauthorized {
        /// Principal derived from the request key.
        requester: Principal,
        /// The handle requested.
        handle: EncryptedValue,
    },

    /// The decryption service does not know the handle.
    #[error("unknown handle {0}")]
    UnknownHandle(EncryptedValue),
}

/// A signed request for the plaintext behind a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureRequest {
    /// The handle to disclose.
    pub handle: EncryptedValue,
    /// Requester's Ed25519 public key.
    pub requester_key: [u8; 32],
    /// Ed25519 signature over the request message.
    pub signature: [u8; 64],
}

impl DisclosureRequest {
    /// The principal the request claims to come from.
    pub fn requester(&self) -> Principal {
        Principal::from_public_key(&self.requester_key)
    }
}

/// An Ed25519 key held by a principal that requests disclosure.
pub struct DisclosureKey {
    signing_key: ed25519_dalek::SigningKey,
}

impl DisclosureKey {
    /// Generate a random key.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Key from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The principal this key speaks for.
    pub fn principal(&self) -> Principal {
        Principal::from_public_key(&self.public_key_bytes())
    }

    /// Sign a request for `handle` on `ledger`.
    pub fn sign_request(&self, handle: EncryptedValue, ledger: Principal) -> DisclosureRequest {
        let signature = self.signing_key.sign(&request_message(handle, ledger));
        DisclosureRequest {
            handle,
            requester_key: self.public_key_bytes(),
            signature: signature.to_bytes(),
        }
    }
}

impl std::fmt::Debug for DisclosureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DisclosureKey({}, <private>)", self.principal())
    }
}

fn request_message(handle: EncryptedValue, ledger: Principal) -> Vec<u8> {
    let mut message = Vec::with_capacity(DOMAIN_TAG.len() + 8 + 20);
    message.extend_from_slice(DOMAIN_TAG);
    message.extend_from_slice(&handle.raw().to_le_bytes());
    message.extend_from_slice(ledger.as_bytes());
    message
}

/// Releases plaintext to principals the grant table authorizes.
pub struct DisclosureOracle<'a, D> {
    ledger: Principal,
    acl: &'a AccessControlRegistry,
    decryptor: &'a D,
}

impl<'a, D: Decrypt> DisclosureOracle<'a, D> {
    /// An oracle for `ledger` reading `acl` and decrypting with `decryptor`.
    pub fn new(ledger: Principal, acl: &'a AccessControlRegistry, decryptor: &'a D) -> Self {
        Self {
            ledger,
            acl,
            decryptor,
        }
    }

    /// Verify, authorize and decrypt.
    pub fn disclose(&self, request: &DisclosureRequest) -> Result<u64, DisclosureError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&request.requester_key)
            .map_err(|e| DisclosureError::BadSignature(format!("invalid public key: {e}")))?;
        let signature = ed25519_dalek::Signature::from_bytes(&request.signature);
        key.verify(&request_message(request.handle, self.ledger), &signature)
            .map_err(|e| DisclosureError::BadSignature(e.to_string()))?;

        let requester = request.requester();
        if !self.acl.is_authorized(request.handle, requester) {
            tracing::warn!(requester = %requester, handle = %request.handle, "disclosure refused");
            return Err(DisclosureError::Unauthorized {
                requester,
                handle: request.handle,
            });
        }

        let plaintext = self
            .decryptor
            .decrypt(request.handle)
            .ok_or(DisclosureError::UnknownHandle(request.handle))?;
        tracing::debug!(requester = %requester, handle = %request.handle, "disclosure released");
        Ok(plaintext)
    }
}

impl<D> std::fmt::Debug for DisclosureOracle<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisclosureOracle")
            .field("ledger", &self.ledger)
            .field("grants", &self.acl.len())
            .finish_non_exhaustive()
    }
}
