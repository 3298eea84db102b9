//! CLI command definitions and handlers.

mod cip30;
mod hd_wallet;
mod keys;

use clap::{Parser, Subcommand};
use csak_ada::encoding::decode_hex;

pub use cip30::{Cip30SignCommand, Cip30VerifyCommand};
pub use hd_wallet::{HdWalletGenerateCommand, HdWalletRestoreCommand};
pub use keys::PrivateToPublicKeyCommand;

/// csak - Cardano Swiss Army Knife.
#[derive(Parser)]
#[command(name = "csak")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new 24-word HD wallet and derive its accounts.
    HdWalletGenerate(HdWalletGenerateCommand),

    /// Restore an HD wallet from a 15 or 24-word mnemonic.
    HdWalletRestore(HdWalletRestoreCommand),

    /// Derive the public key and enterprise address of a private key.
    PrivateToPublicKey(PrivateToPublicKeyCommand),

    /// Sign a message the way CIP-30 wallets do (`signData`).
    #[command(name = "cip30-sign")]
    Cip30Sign(Cip30SignCommand),

    /// Verify a CIP-30 `COSE_Sign1` signature.
    #[command(name = "cip30-verify")]
    Cip30Verify(Cip30VerifyCommand),
}

/// Decode hex typed by a user, tolerating whitespace and a `0x` prefix.
fn parse_hex(input: &str, what: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    decode_hex(input).map_err(|e| format!("invalid {what} hex: {e}").into())
}
