//! Command-line and environment configuration
use super::error::StoreError;
use super::sled_store::SledStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scf-ledger")]
#[command(about = "Record and query supply-chain-finance events in a ledger-backed store")]
pub struct Args {
    /// Path of the sled database
    #[arg(long, env = "SCF_LEDGER_DB", default_value = "scf-ledger.db")]
    pub db: PathBuf,

    /// Log level for this crate; RUST_LOG takes precedence when set
    #[arg(long, env = "SCF_LEDGER_LOG", default_value = "info")]
    pub log_level: String,

    /// Background flush interval in milliseconds (sled default when unset)
    #[arg(long, env = "SCF_LEDGER_FLUSH_MS")]
    pub flush_every_ms: Option<u64>,

    /// Use a throwaway database that is deleted on exit
    #[arg(long)]
    pub temporary: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Invoke an operation: its name followed by its arguments
    Invoke {
        #[arg(required = true, value_name = "OPERATION [ARGS]")]
        call: Vec<String>,
    },
    /// List the operation names the dispatcher binds
    Operations,
}

impl Args {
    pub fn open_store(&self) -> Result<SledStore, StoreError> {
        let mut config = sled::Config::new()
            .path(&self.db)
            .temporary(self.temporary);
        if let Some(ms) = self.flush_every_ms {
            config = config.flush_every_ms(Some(ms));
        }
        Ok(SledStore::new(config.open()?))
    }

    /// Default `EnvFilter` directive.
    pub fn log_directive(&self) -> String {
        format!("scf_ledger={}", self.log_level)
    }
}
