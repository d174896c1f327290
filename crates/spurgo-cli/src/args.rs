//! Command-line surface for `spurgo-cli`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spurgo-cli", version, about = "spurgo admin CLI", long_about = None)]
pub struct Cli {
    /// Service base URL, e.g. <http://127.0.0.1:3100>
    #[arg(long, env = "SPURGO_SITE_URL")]
    pub site: Option<String>,

    /// Path to a file containing the admin token (takes precedence over the
    /// SPURGO_ADMIN_TOKEN environment variable; no CLI flag, to keep tokens
    /// out of shell history)
    #[arg(long, env = "SPURGO_ADMIN_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit purge tasks
    Purge(PurgeArgs),
    /// Inspect or clear the purge history
    History(HistoryArgs),
    /// Edge credential settings
    Settings(SettingsArgs),
}

#[derive(Parser, Debug)]
pub struct PurgeArgs {
    #[command(subcommand)]
    pub action: PurgeCmd,
}

#[derive(Subcommand, Debug)]
pub enum PurgeCmd {
    /// Purge a single URL
    Url { url: String },
    /// Purge the entire zone (invalidate)
    All {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryCmd,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCmd {
    /// List recent purge attempts, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Drop the whole history
    Clear {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    /// Show the stored edge settings (secret key redacted)
    Show,
    /// Update one or more edge settings fields
    Set {
        #[arg(long)]
        secret_id: Option<String>,
        /// Path to a file containing the API secret key (falls back to the
        /// SPURGO_EDGE_SECRET_KEY environment variable; no CLI flag, to keep
        /// secrets out of shell history)
        #[arg(long)]
        secret_key_file: Option<PathBuf>,
        #[arg(long)]
        zone_id: Option<String>,
        #[arg(long)]
        default_host: Option<String>,
    },
}
