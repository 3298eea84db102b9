//! CIP-30 message signing CLI commands.

use std::process::ExitCode;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use clap::{Args, ValueEnum};
use colored::Colorize;
use csak::Wallet;
use csak_ada::{Address, Deriver, Network, PrivateKey, Role, VerificationResult, cip30};

use super::parse_hex;

/// How the message argument is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// UTF-8 text.
    #[default]
    Text,
    /// Hex-encoded bytes.
    Hex,
}

/// How a verified message is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// UTF-8 text, falling back to hex for binary payloads.
    #[default]
    Text,
    /// Hex.
    Hex,
    /// Standard base64.
    Base64,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            _ => Err(format!("invalid format '{s}', expected one of: text, hex, base64")),
        }
    }
}

/// Sign a message with a wallet key.
#[derive(Args)]
pub struct Cip30SignCommand {
    /// Message to sign (see --message-format).
    message: String,

    /// Mnemonic phrase (15 or 24 words). Signs with the account 0 payment key.
    #[arg(required_unless_present = "key", conflicts_with = "key")]
    mnemonic: Vec<String>,

    /// Sign with a raw private key instead (32 or 64-byte hex). Requires --address.
    #[arg(short, long)]
    key: Option<String>,

    /// Signer address (bech32). Defaults to the wallet's base address.
    #[arg(short, long)]
    address: Option<String>,

    /// Input format of the message.
    #[arg(long, value_enum, default_value_t = MessageFormat::Text)]
    message_format: MessageFormat,

    /// Sign the Blake2b-224 digest instead of the message (hardware wallet mode).
    #[arg(long)]
    hashed: bool,

    /// Network: mainnet, preprod, preview or testnet.
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// BIP39 passphrase of the wallet.
    #[arg(short, long)]
    passphrase: Option<String>,
}

/// Who signs: a wallet derived from a mnemonic, or a bare key with an explicit address.
enum Signer {
    Mnemonic { wallet: Wallet, address: Option<Address> },
    RawKey { key: PrivateKey, address: Address },
}

impl Signer {
    fn key_and_address(
        self,
        network: Network,
    ) -> Result<(PrivateKey, Address), Box<dyn std::error::Error>> {
        match self {
            Self::Mnemonic { wallet, address } => {
                let keys = Deriver::new(&wallet, network).account_keys(0)?;
                let address = address.unwrap_or_else(|| keys.payment_address(network));
                Ok((keys.role(Role::External).private_key(), address))
            }
            Self::RawKey { key, address } => Ok((key, address)),
        }
    }
}

impl Cip30SignCommand {
    fn signer(&self) -> Result<Signer, Box<dyn std::error::Error>> {
        let address = self.address.as_deref().map(Address::from_bech32).transpose()?;
        if let Some(key) = &self.key {
            let address = address.ok_or("signing with a raw key requires --address")?;
            return Ok(Signer::RawKey {
                key: PrivateKey::from_hex(key)?,
                address,
            });
        }

        let words: Vec<&str> = self.mnemonic.iter().flat_map(|w| w.split_whitespace()).collect();
        let wallet = Wallet::from_words(&words, self.passphrase.as_deref())?;
        Ok(Signer::Mnemonic { wallet, address })
    }

    /// Execute the sign command.
    #[rustfmt::skip]
    pub fn execute(self) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let network: Network = self.network.parse()?;
        let payload = match self.message_format {
            MessageFormat::Text => self.message.as_bytes().to_vec(),
            MessageFormat::Hex => parse_hex(&self.message, "message")?,
        };
        let (key, address) = self.signer()?.key_and_address(network)?;
        let signed = cip30::sign(address.as_bytes(), &payload, &key, self.hashed)?;
        let mode = if self.hashed { "hashed (hardware wallet compatible)" } else { "full payload" };

        println!();
        println!("      {}       {}", "Network".cyan().bold(), network.name().to_uppercase());
        if self.message_format == MessageFormat::Text {
            println!("      {}       {}", "Message".cyan().bold(), self.message);
        }
        println!("      {}   {}", "Message Hex".cyan().bold(), hex::encode(&payload));
        println!("      {}       {}", "Address".cyan().bold(), address.to_bech32()?.green());
        println!("      {}          {}", "Mode".cyan().bold(), mode.dimmed());
        println!("      {}    {}", "Public Key".cyan().bold(), signed.public_key.to_hex());
        println!("      {}     {}", "Signature".cyan().bold(), signed.signature_hex().green());
        println!("      {}           {}", "Key".cyan().bold(), signed.key_hex().green());
        println!();
        println!("      {}", "Verify with:".dimmed());
        println!("      csak cip30-verify {} -k {}", signed.signature_hex(), signed.key_hex());
        println!();
        Ok(ExitCode::SUCCESS)
    }
}

/// Verify a CIP-30 signature.
#[derive(Args)]
pub struct Cip30VerifyCommand {
    /// `COSE_Sign1` envelope hex, as returned by `signData`.
    signature: String,

    /// Public key to verify against: raw 32-byte hex or `COSE_Key` hex.
    /// Defaults to the key embedded in the envelope.
    #[arg(short, long)]
    key: Option<String>,

    /// How to print the recovered message: text, hex or base64.
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Also require the envelope to sign exactly this UTF-8 message.
    #[arg(long)]
    expect: Option<String>,
}

impl Cip30VerifyCommand {
    /// Execute the verify command. Exits with 1 unless the signature is valid.
    #[rustfmt::skip]
    pub fn execute(self) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let format: OutputFormat = self.format.parse()?;
        let envelope = parse_hex(&self.signature, "signature")?;
        let key = self.key.as_deref().map(cip30::public_key_from_hex).transpose()?;
        let result = cip30::verify(&envelope, key.as_ref())?;
        let matches = self.expect.as_ref().map(|m| result.matches_payload(m.as_bytes()));
        let ok = result.valid && matches.unwrap_or(true);

        println!();
        println!("      {}         {}", "Valid".cyan().bold(), yes_no(result.valid));
        if let Some(matches) = matches {
            println!("      {} {}", "Message Match".cyan().bold(), yes_no(matches));
        }
        println!("      {}        {}", "Hashed".cyan().bold(), if result.is_hashed { "yes" } else { "no" });
        println!("      {}       {}", "Address".cyan().bold(), render_address(&result));
        println!("      {}    {}", "Public Key".cyan().bold(), result.public_key.to_hex());
        println!("      {}     {}", "Signature".cyan().bold(), result.signature.to_hex().dimmed());
        println!("      {}   {}", "Payload Hex".cyan().bold(), hex::encode(&result.message));
        println!("      {}       {}", "Message".cyan().bold(), render_message(&result, format));
        println!();
        Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value { "yes".green().bold() } else { "no".red().bold() }
}

fn render_address(result: &VerificationResult) -> String {
    match (&result.address, result.address_bech32()) {
        (_, Some(bech32)) => bech32,
        (Some(raw), None) => hex::encode(raw),
        (None, None) => "(none)".to_owned(),
    }
}

/// Hashed payloads are digests, so they always render as hex.
fn render_message(result: &VerificationResult, format: OutputFormat) -> String {
    if result.is_hashed {
        return hex::encode(&result.message);
    }
    match format {
        OutputFormat::Text => String::from_utf8(result.message.clone())
            .unwrap_or_else(|_| hex::encode(&result.message)),
        OutputFormat::Hex => hex::encode(&result.message),
        OutputFormat::Base64 => BASE64.encode(&result.message),
    }
}
