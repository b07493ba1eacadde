//! # Validate-Config Subcommand
//!
//! Loads a ledger configuration (YAML, or JSON by extension), validates it
//! and echoes the effective values, including the resolved proof policy.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use obscura_ledger::LedgerConfig;

/// Arguments for the validate-config subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file.
    pub path: PathBuf,
}

/// Load and validate the configuration named by `args`.
pub fn execute(args: &ValidateArgs) -> anyhow::Result<LedgerConfig> {
    let config = LedgerConfig::from_path(&args.path)
        .with_context(|| format!("configuration {} is not valid", args.path.display()))?;
    tracing::info!(
        path = %args.path.display(),
        ledger = %config.ledger_principal,
        authority = %config.authority,
        policy = %config.proof_policy.mode(),
        "configuration valid"
    );
    Ok(config)
}
