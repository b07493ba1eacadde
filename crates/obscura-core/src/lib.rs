//! # obscura-core: Foundational Types for the Confidential Ledger
//!
//! The leaf of the Obscura crate graph. Defines the vocabulary every other
//! crate speaks: who acts (`Principal`), what is stored (`EncryptedValue`
//! handles), what callers submit (`ExternalCiphertext` + `InputProof`), what
//! the ledger announces (`LedgerEvent`), and how it fails (`LedgerError`).
//!
//! ## Key Design Principles
//!
//! 1. **Handles, not bytes.** `EncryptedValue` and `EncryptedBool` are
//!    capability tokens into the external encryption engine. They expose no
//!    accessor for plaintext and no ciphertext bytes.
//!
//! 2. **Newtype principals.** `Principal` is a 20-byte address with an
//!    explicit null value (`Principal::ZERO`). No bare byte arrays or strings
//!    for identities.
//!
//! 3. **Amount-free events.** `LedgerEvent` variants carry addresses only.
//!    There is no way to attach a value to an event.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `obscura-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod event;
pub mod handle;
pub mod identity;
pub mod input;

mod hex;

pub use error::{EngineError, LedgerError};
pub use event::LedgerEvent;
pub use handle::{EncryptedBool, EncryptedValue};
pub use identity::Principal;
pub use input::{ExternalCiphertext, ImportContext, InputProof};
