//! # obscura-zkp: Input Proof Verification
//!
//! Every amount that enters the ledger arrives as a ciphertext encrypted by
//! the client, accompanied by a proof that the ciphertext was produced for a
//! specific sender and a specific ledger instance. This crate defines the
//! seam through which the ledger asks an external verifier whether that
//! binding holds.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`InputVerifier`] is the contract every
//!   verifier backend satisfies.
//! - **Mock** (`mock.rs`): [`MockInputVerifier`] and [`MockInputProver`]
//!   produce and check transparent SHA-256 binding digests. No
//!   zero-knowledge guarantees.
//! - **Policy** (`policy.rs`): [`ProofPolicy`] refuses mock backends in
//!   production deployments.
//!
//! ## Crate Policy
//!
//! - Depends only on `obscura-core` internally.
//! - Verification is a pure function of its inputs; verifiers retain no
//!   state across calls.

#[cfg(feature = "mock")]
pub mod mock;
pub mod policy;
pub mod traits;

#[cfg(feature = "mock")]
pub use mock::{MockInputProver, MockInputVerifier};
pub use policy::{PolicyError, PolicyMode, ProofBackend, ProofPolicy};
pub use traits::{InputVerifier, VerifyError};
