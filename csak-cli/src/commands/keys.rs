//! Key conversion CLI commands.

use std::process::ExitCode;

use clap::{Args, ValueEnum};
use colored::Colorize;
use csak_ada::{Address, Network, PrivateKey};

/// How the private key argument is encoded.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum KeyFormat {
    /// Raw key hex: 32-byte Ed25519 seed or 64-byte extended key.
    Hex,
    /// CBOR byte string hex, as in `cardano-cli` key files.
    #[default]
    Cbor,
}

/// Derive a public key and enterprise address from a private key.
#[derive(Args)]
pub struct PrivateToPublicKeyCommand {
    /// Private key (hex or CBOR hex, see --format).
    key: String,

    /// Network: mainnet, preprod, preview or testnet.
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// Input format of the private key.
    #[arg(short, long, value_enum, default_value_t = KeyFormat::Cbor)]
    format: KeyFormat,
}

impl PrivateToPublicKeyCommand {
    /// Execute the conversion.
    #[rustfmt::skip]
    pub fn execute(self) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let network: Network = self.network.parse()?;
        let key = match self.format {
            KeyFormat::Hex => PrivateKey::from_hex(&self.key)?,
            KeyFormat::Cbor => PrivateKey::from_cbor_hex(&self.key)?,
        };
        let public = key.public_key();
        let address = Address::enterprise(network, &public).to_bech32()?;

        println!();
        println!("      {}      {}", "Network".cyan().bold(), network.name().to_uppercase());
        println!("      {}     {}", "Key Type".cyan().bold(), if key.is_extended() { "extended (64 bytes)" } else { "standard (32 bytes)" }.dimmed());
        println!("      {}   {}", "Public Key".cyan().bold(), public.to_hex());
        println!("      {}  {}", "Public CBOR".cyan().bold(), public.to_cbor_hex()?);
        println!("      {}      {}", "Address".cyan().bold(), address.green());
        println!();
        Ok(ExitCode::SUCCESS)
    }
}
