//! # Proof Backend Policy
//!
//! Decides whether a verifier backend may be trusted in the current
//! deployment. A ledger that accepts mock input proofs in production lets
//! anyone import any ciphertext under any sender's name, so production mode
//! refuses the mock backend before verification is even attempted.
//!
//! ## Configuration
//!
//! The policy mode is determined by:
//! 1. Explicit construction (`ProofPolicy::new`, or `proof_policy` in the
//!    ledger configuration file)
//! 2. The `OBSCURA_PROOF_POLICY` environment variable
//! 3. The build profile: release builds default to `Production`, debug
//!    builds to `Development`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted by [`ProofPolicy::from_environment`].
pub const POLICY_ENV_VAR: &str = "OBSCURA_PROOF_POLICY";

/// Errors from proof policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Mock proof rejected in production mode.
    #[error("mock proof rejected: production mode requires a real proof backend ({backend})")]
    MockProofRejected {
        /// The proof backend that was rejected.
        backend: String,
    },
}

/// The kind of proof backend behind a verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofBackend {
    /// Transparent SHA-256 binding digest. No cryptographic security.
    Mock,
    /// An external verifier service with real soundness guarantees.
    External,
}

impl ProofBackend {
    /// Whether this backend provides real cryptographic security.
    pub fn is_real(self) -> bool {
        matches!(self, ProofBackend::External)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ProofBackend::Mock => "mock-sha256",
            ProofBackend::External => "external",
        }
    }
}

/// Proof policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Reject mock proofs unconditionally.
    Production,
    /// Accept mock proofs (tests and local development only).
    Development,
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

/// Runtime policy deciding whether a proof backend is acceptable.
///
/// ```rust
/// use obscura_zkp::policy::{ProofBackend, ProofPolicy};
///
/// let policy = ProofPolicy::production();
/// assert!(policy.validate(ProofBackend::External).is_ok());
/// assert!(policy.validate(ProofBackend::Mock).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Create a policy with the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Create a production policy (rejects mock proofs).
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Create a development policy (accepts mock proofs).
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Create a policy from `OBSCURA_PROOF_POLICY`, falling back to the
    /// build profile default.
    pub fn from_environment() -> Self {
        match std::env::var(POLICY_ENV_VAR) {
            Ok(val) => Self::parse_mode(&val).map(Self::new).unwrap_or_else(|| {
                tracing::warn!(value = %val, var = POLICY_ENV_VAR, "unrecognised proof policy; using build default");
                Self::build_default()
            }),
            Err(_) => Self::build_default(),
        }
    }

    /// The build profile default: production for release builds.
    pub fn build_default() -> Self {
        if cfg!(not(debug_assertions)) {
            Self::production()
        } else {
            Self::development()
        }
    }

    fn parse_mode(value: &str) -> Option<PolicyMode> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(PolicyMode::Production),
            "development" | "dev" => Some(PolicyMode::Development),
            _ => None,
        }
    }

    /// Validate whether a proof backend is acceptable under this policy.
    pub fn validate(&self, backend: ProofBackend) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_real() => Err(PolicyError::MockProofRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Current policy mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::from_environment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_rejects_mock() {
        assert!(ProofPolicy::production().validate(ProofBackend::Mock).is_err());
    }

    #[test]
    fn production_accepts_external() {
        assert!(ProofPolicy::production().validate(ProofBackend::External).is_ok());
    }

    #[test]
    fn development_accepts_everything() {
        let policy = ProofPolicy::development();
        assert!(policy.validate(ProofBackend::Mock).is_ok());
        assert!(policy.validate(ProofBackend::External).is_ok());
    }

    #[test]
    fn backend_names_and_strength() {
        assert_eq!(ProofBackend::Mock.name(), "mock-sha256");
        assert!(!ProofBackend::Mock.is_real());
        assert!(ProofBackend::External.is_real());
    }

    #[test]
    fn parse_mode_aliases() {
        assert_eq!(ProofPolicy::parse_mode("PROD"), Some(PolicyMode::Production));
        assert_eq!(ProofPolicy::parse_mode(" dev "), Some(PolicyMode::Development));
        assert_eq!(ProofPolicy::parse_mode("staging"), None);
    }

    #[test]
    fn error_message_includes_backend() {
        let err = ProofPolicy::production()
            .validate(ProofBackend::Mock)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mock-sha256"));
        assert!(msg.contains("production mode"));
    }

    #[test]
    fn build_default_matches_profile() {
        let expected = if cfg!(debug_assertions) {
            PolicyMode::Development
        } else {
            PolicyMode::Production
        };
        assert_eq!(ProofPolicy::build_default().mode(), expected);
    }

    #[test]
    fn policy_serializes_as_mode() {
        let json = serde_json::to_string(&ProofPolicy::production()).unwrap();
        assert_eq!(json, "\"production\"");
        let back: ProofPolicy = serde_json::from_str("\"development\"").unwrap();
        assert_eq!(back.mode(), PolicyMode::Development);
    }
}
