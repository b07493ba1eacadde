//! # Principal Identity
//!
//! A `Principal` is a 20-byte account address. Every actor the ledger knows
//! about is a principal: account holders, the issuing authority, and the
//! ledger instance itself (which must hold grants on its own handles to use
//! them as operands later).
//!
//! ## Security Invariant
//!
//! `Principal::ZERO` is the null principal. It is never a valid credit or
//! transfer target, and never a valid authority. Operations check for it
//! explicitly via [`Principal::is_zero`].
//!
//! ## Serde
//!
//! Serializes as a `0x`-prefixed lowercase hex string (42 chars).

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::hex;

/// Length of a principal address in bytes.
pub const PRINCIPAL_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Principal(pub [u8; PRINCIPAL_LEN]);

/// Error parsing a principal from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid principal {input:?}: {reason}")]
pub struct PrincipalParseError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

impl Principal {
    /// The null principal.
    pub const ZERO: Principal = Principal([0u8; PRINCIPAL_LEN]);

    /// Create a principal from raw bytes.
    pub fn from_bytes(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the principal controlled by an Ed25519 public key.
    ///
    /// The address is the last 20 bytes of `SHA-256(public_key)`.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let digest = Sha256::digest(public_key);
        let mut bytes = [0u8; PRINCIPAL_LEN];
        bytes.copy_from_slice(&digest[32 - PRINCIPAL_LEN..]);
        Self(bytes)
    }

    /// Return the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LEN] {
        &self.0
    }

    /// Whether this is the null principal.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PRINCIPAL_LEN]
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Parse from 40 hex digits, with or without a `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, PrincipalParseError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != PRINCIPAL_LEN * 2 {
            return Err(PrincipalParseError {
                input: input.to_string(),
                reason: format!(
                    "expected {} hex digits, got {}",
                    PRINCIPAL_LEN * 2,
                    digits.len()
                ),
            });
        }
        let bytes = hex::decode(&digits.to_lowercase()).map_err(|reason| PrincipalParseError {
            input: input.to_string(),
            reason,
        })?;
        let mut arr = [0u8; PRINCIPAL_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Principal({})", self.to_hex())
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
