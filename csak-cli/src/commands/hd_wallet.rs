//! HD wallet CLI commands.

use std::process::ExitCode;

use clap::Args;
use colored::Colorize;
use csak::Wallet;
use csak_ada::{DerivedAccount, Deriver, Network};

/// Generate a fresh 24-word wallet.
#[derive(Args)]
pub struct HdWalletGenerateCommand {
    /// Network: mainnet, preprod, preview or testnet.
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// Number of accounts to derive, starting at index 0.
    #[arg(short, long, default_value = "1")]
    count: u32,

    /// BIP39 passphrase (optional extra security).
    #[arg(short, long)]
    passphrase: Option<String>,
}

impl HdWalletGenerateCommand {
    /// Execute the generate command.
    pub fn execute(self) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let network: Network = self.network.parse()?;
        check_count(self.count)?;

        let wallet = Wallet::generate(self.passphrase.as_deref())?;
        let accounts = Deriver::new(&wallet, network).derive_many(0, self.count)?;
        print_wallet(&wallet, network, &accounts, false);
        Ok(ExitCode::SUCCESS)
    }
}

/// Restore a wallet from its mnemonic.
#[derive(Args)]
pub struct HdWalletRestoreCommand {
    /// Mnemonic phrase: 15 or 24 words, separate arguments or one quoted string.
    #[arg(required = true, num_args = 1..)]
    words: Vec<String>,

    /// Network: mainnet, preprod, preview or testnet.
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// Number of accounts to derive, starting at index 0.
    #[arg(short, long, default_value = "1")]
    count: u32,

    /// BIP39 passphrase used when the wallet was created.
    #[arg(short, long)]
    passphrase: Option<String>,
}

impl HdWalletRestoreCommand {
    /// Execute the restore command.
    pub fn execute(self) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let network: Network = self.network.parse()?;
        check_count(self.count)?;

        let words: Vec<&str> = self.words.iter().flat_map(|w| w.split_whitespace()).collect();
        let wallet = Wallet::from_words(&words, self.passphrase.as_deref())?;
        let accounts = Deriver::new(&wallet, network).derive_many(0, self.count)?;
        print_wallet(&wallet, network, &accounts, true);
        Ok(ExitCode::SUCCESS)
    }
}

fn check_count(count: u32) -> Result<(), String> {
    if count == 0 {
        return Err("count must be at least 1".to_owned());
    }
    Ok(())
}

#[rustfmt::skip]
fn print_wallet(wallet: &Wallet, network: Network, accounts: &[DerivedAccount], restored: bool) {
    println!();
    println!("      {}       {}", "Network".cyan().bold(), network.name().to_uppercase());
    if restored {
        println!("      {}         {}", "Words".cyan().bold(), wallet.word_count());
    }
    println!("      {}      {}", "Mnemonic".cyan().bold(), wallet.mnemonic());
    if wallet.has_passphrase() {
        println!("      {}    {}", "Passphrase".cyan().bold(), "(set)".dimmed());
    }
    println!("      {}        {}", "Wallet".cyan().bold(), "Icarus (CIP-1852)".dimmed());
    println!();

    for (i, account) in accounts.iter().enumerate() {
        println!("      {}       {}", "Account".cyan().bold(), format!("[{}]", account.account).dimmed());
        for (role, path) in &account.paths {
            println!("      {}  {}", format!("{:<12}", role.name()).cyan(), path);
        }
        println!("      {}  {}", "Base Address".cyan().bold(), account.base_address.green());
        println!("      {} {}", "Stake Address".cyan().bold(), account.stake_address.green());
        println!("      {}   {}", "Private Key".cyan().bold(), account.private_key_hex.as_str());
        println!("      {}  {}", "Private CBOR".cyan().bold(), account.private_key_cbor_hex.as_str());
        println!("      {}    {}", "Public Key".cyan().bold(), account.public_key_hex);
        println!("      {}   {}", "Public CBOR".cyan().bold(), account.public_key_cbor_hex);
        if i < accounts.len() - 1 {
            println!();
        }
    }
    println!();
    println!("      {}", "Keep the mnemonic and private keys secret: they control the funds.".yellow());
    println!();
}
