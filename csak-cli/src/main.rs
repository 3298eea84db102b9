//! csak - Cardano Swiss Army Knife.
//!
//! Generate and restore HD wallets, convert keys and sign or verify CIP-30 messages.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use commands::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::HdWalletGenerate(cmd) => cmd.execute(),
        Commands::HdWalletRestore(cmd) => cmd.execute(),
        Commands::PrivateToPublicKey(cmd) => cmd.execute(),
        Commands::Cip30Sign(cmd) => cmd.execute(),
        Commands::Cip30Verify(cmd) => cmd.execute(),
    }
}

/// Log to stderr so stdout stays clean for results.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
