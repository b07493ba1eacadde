//! # obscura-cli: Obscura Command-Line Harness
//!
//! Drives a confidential ledger from files, for local runs and demos.
//!
//! ## Subcommands
//!
//! - `validate-config`: parse and check a ledger configuration
//! - `run`: execute a scripted scenario against a fresh ledger backed by the
//!   mock encryption service, and print a JSON report
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from execution; handlers return values,
//!   `main` prints them.
//! - All ledger semantics live in `obscura-ledger`. Nothing here inspects a
//!   plaintext except through the disclosure oracle.

pub mod scenario;
pub mod validate;
