//! # obscura-fhe: Encrypted Value Engine
//!
//! The ledger performs arithmetic on balances it cannot read. This crate is
//! the boundary to the homomorphic-encryption service that makes that
//! possible.
//!
//! ## Architecture
//!
//! - **Backend** (`backend.rs`): [`FheBackend`] is the contract for the
//!   external encryption service: ingest an external ciphertext, add,
//!   subtract, compare and select over opaque handles. [`Decrypt`] is the
//!   separate capability only a disclosure oracle holds.
//! - **Engine** (`engine.rs`): [`EncryptedValueEngine`] wraps a backend with
//!   an input verifier and a proof policy. It is the only way an external
//!   ciphertext becomes a handle.
//! - **Mock** (`mock.rs`): [`MockFheBackend`] keeps plaintexts in an arena
//!   indexed by handle; [`MockClient`] produces external ciphertexts and
//!   matching mock proofs. Transparent, for tests and local runs only.
//!
//! ## Crate Policy
//!
//! - The engine exposes no plaintext. Only [`Decrypt`] does, and the ledger
//!   never requires it.
//! - Every operation returns a fresh handle; nothing is mutated in place.

pub mod backend;
pub mod engine;
#[cfg(feature = "mock")]
pub mod mock;

pub use backend::{Decrypt, FheBackend};
pub use engine::EncryptedValueEngine;
#[cfg(feature = "mock")]
pub use mock::{MockClient, MockFheBackend};
