//! # Ledger Configuration
//!
//! Everything a ledger instance needs to know at construction: its own
//! principal, the initial issuing authority, and the proof policy.
//!
//! ```yaml
//! ledger_principal: "0x00000000000000000000000000000000000000aa"
//! authority: "0x0000000000000000000000000000000000000001"
//! proof_policy: development
//! ```
//!
//! `proof_policy` may be omitted; it then follows `OBSCURA_PROOF_POLICY` and
//! the build profile (see [`ProofPolicy::from_environment`]).

use std::path::{Path, PathBuf};

use obscura_core::Principal;
use obscura_zkp::ProofPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating a [`LedgerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The values parsed but are not usable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Construction parameters for a [`ConfidentialLedger`](crate::ConfidentialLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// The ledger's own principal. Every stored handle is granted to it so
    /// later operations can use the handle as an operand.
    pub ledger_principal: Principal,
    /// The initial issuing authority.
    pub authority: Principal,
    /// Which input-proof backends are acceptable.
    #[serde(default)]
    pub proof_policy: ProofPolicy,
}

impl LedgerConfig {
    /// Config with the environment-derived proof policy.
    pub fn new(ledger_principal: Principal, authority: Principal) -> Self {
        Self {
            ledger_principal,
            authority,
            proof_policy: ProofPolicy::from_environment(),
        }
    }

    /// Replace the proof policy.
    pub fn with_proof_policy(mut self, policy: ProofPolicy) -> Self {
        self.proof_policy = policy;
        self
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.json` files are parsed as JSON, anything else as
    /// YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        }
    }

    /// Reject null principals and a ledger that is its own authority.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger_principal.is_zero() {
            return Err(ConfigError::Invalid(
                "ledger_principal must not be the null principal".into(),
            ));
        }
        if self.authority.is_zero() {
            return Err(ConfigError::Invalid(
                "authority must not be the null principal".into(),
            ));
        }
        if self.ledger_principal == self.authority {
            return Err(ConfigError::Invalid(
                "ledger_principal and authority must differ".into(),
            ));
        }
        Ok(())
    }
}
