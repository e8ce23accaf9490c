//! Symbol Wallet CLI
//!
//! Command-line access to path validation, account listing and wallet record
//! creation. Secrets are never taken as arguments: mnemonics and private keys
//! are read from stdin and the password from `SYMBOL_WALLET_PASSWORD`.

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use symbol_wallet::account::WalletRecordFactory;
use symbol_wallet::crypto::{
    derive_account_sequence, increment_level, validate, HdNetwork, Level, MnemonicPassPhrase, NetworkType, Password,
    DEFAULT_WALLET_PATH,
};
use symbol_wallet::WalletConfig;

const PASSWORD_VAR: &str = "SYMBOL_WALLET_PASSWORD";

#[derive(Parser)]
#[command(name = "symbol-wallet")]
#[command(about = "Symbol HD wallet tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a derivation path against the five-level hardened schema
    ValidatePath { path: String },
    /// Print the sibling path with one level incremented
    NextPath {
        path: String,
        #[arg(long, value_enum, default_value_t = LevelArg::AddressIndex)]
        level: LevelArg,
    },
    /// List accounts following a start path (mnemonic on stdin)
    Addresses {
        #[arg(long, default_value = "testnet")]
        network: NetworkType,
        #[arg(long, default_value = DEFAULT_WALLET_PATH)]
        start_path: String,
        /// Number of accounts; defaults to SYMBOL_WALLET_DEFAULT_COUNT or 10
        #[arg(long)]
        count: Option<usize>,
    },
    /// Build a wallet record and print it as JSON
    CreateWallet {
        /// Owning account identifier
        #[arg(long)]
        account: String,
        #[arg(long, default_value = "testnet")]
        network: NetworkType,
        #[command(subcommand)]
        kind: WalletKind,
    },
}

#[derive(Subcommand)]
enum WalletKind {
    /// Wallet at the default path (mnemonic on stdin)
    Seed,
    /// Wallet at a chosen path (mnemonic on stdin)
    Child {
        #[arg(long)]
        path: String,
        #[arg(long)]
        name: String,
    },
    /// Wallet around a hex private key (key on stdin)
    Imported {
        #[arg(long)]
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Purpose,
    CoinType,
    Account,
    Chain,
    AddressIndex,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Purpose => Level::Purpose,
            LevelArg::CoinType => Level::CoinType,
            LevelArg::Account => Level::Account,
            LevelArg::Chain => Level::Chain,
            LevelArg::AddressIndex => Level::AddressIndex,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = WalletConfig::from_env()?;

    match cli.command {
        Commands::ValidatePath { path } => {
            let valid = validate(&path);
            println!("{}", valid);
            if !valid {
                std::process::exit(1);
            }
        }
        Commands::NextPath { path, level } => {
            println!("{}", increment_level(&path, level.into())?);
        }
        Commands::Addresses {
            network,
            start_path,
            count,
        } => {
            let mnemonic = read_mnemonic()?;
            let count = count.unwrap_or(config.default_account_count);
            let accounts = derive_account_sequence(&mnemonic, HdNetwork::Catapult, network, &start_path, count)?;
            for account in accounts {
                println!("{}\t{}", account.address().pretty(), account.public_key_hex());
            }
        }
        Commands::CreateWallet { account, network, kind } => {
            let password = read_password()?;
            let factory = WalletRecordFactory::new(config);

            let record = match kind {
                WalletKind::Seed => {
                    let mnemonic = read_mnemonic()?;
                    factory.build_seed_wallet(&account, &mnemonic, &password, network)?
                }
                WalletKind::Child { path, name } => {
                    let mnemonic = read_mnemonic()?;
                    factory.build_child_wallet(&account, &password, &mnemonic, &path, network, &name)?
                }
                WalletKind::Imported { name } => {
                    let private_key = read_secret_line()?;
                    factory.build_imported_wallet(&account, &password, &name, &private_key, network)?
                }
            };

            info!(wallet_id = %record.id, "Wallet record created");
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn read_secret_line() -> anyhow::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    let trimmed = Zeroizing::new(line.trim().to_string());
    if trimmed.is_empty() {
        bail!("expected a value on stdin");
    }
    Ok(trimmed)
}

fn read_mnemonic() -> anyhow::Result<MnemonicPassPhrase> {
    let phrase = read_secret_line()?;
    Ok(MnemonicPassPhrase::parse(&phrase)?)
}

fn read_password() -> anyhow::Result<Password> {
    let password = std::env::var(PASSWORD_VAR).with_context(|| format!("{} is not set", PASSWORD_VAR))?;
    Ok(Password::new(password))
}
