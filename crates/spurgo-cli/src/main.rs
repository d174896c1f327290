//! spurgo-cli: admin command-line client for the spurgo purge service.

mod args;
mod client;
mod handlers;
mod io;
mod print;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Purge(cmd) => handlers::purge::handle(&ctx, cmd.action).await?,
        Commands::History(cmd) => handlers::history::handle(&ctx, cmd.action).await?,
        Commands::Settings(cmd) => handlers::settings::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
