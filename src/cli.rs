use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lending dashboard core: market rows, wallet balances and a local
/// forwarder for the Sui node.
#[derive(Parser)]
#[command(name = "scallop-dash", version, about)]
pub struct Cli {
    /// Path to a JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (dashboard API + node forwarder)
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch and print the normalized market rows
    Markets {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up one coin balance for an address
    Balance {
        /// Owner address (0x-prefixed)
        address: String,

        /// Fully qualified coin type, e.g. 0x2::sui::SUI
        coin_type: String,

        /// Decimals of the coin
        #[arg(long, default_value = "9")]
        decimals: u8,
    },
}
