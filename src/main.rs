//! prereq - Solana prerequisite workflows
//!
//! Command line front end for wallet utilities, the fee-aware drain
//! transfer and the two-phase enrollment.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prereq_client::{
    config::Config,
    enrollment::EnrollmentOrchestrator,
    ledger::{LedgerClient, RpcLedger},
    transfer::TransferPlanner,
    tx_builder::{enrollment_address, explorer_url, TransactionSubmitter, WorkflowError},
    wallet::{self, WalletManager},
};
use std::future::Future;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the RPC endpoint
    #[arg(long, env = "PREREQ_RPC_URL")]
    rpc_url: Option<String>,

    /// Override the keypair file
    #[arg(short, long, env = "PREREQ_KEYPAIR")]
    keypair: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new wallet and print it in wallet-file format
    Keygen {
        /// Also write the wallet to this file
        #[arg(long)]
        out: Option<String>,
    },
    /// Convert a base58 private key into wallet-file bytes (reads stdin when omitted)
    Base58ToWallet { private_key: Option<String> },
    /// Convert wallet-file bytes into a base58 private key (reads stdin when omitted)
    WalletToBase58 { wallet_json: Option<String> },
    /// Request a devnet airdrop to the wallet
    Airdrop {
        #[arg(long)]
        lamports: Option<u64>,
    },
    /// Send a fixed amount to the configured destination
    Transfer {
        #[arg(long)]
        lamports: u64,
        /// Override the configured destination
        #[arg(long)]
        to: Option<String>,
    },
    /// Send the entire balance minus the fee to the configured destination
    Drain {
        /// Override the configured destination
        #[arg(long)]
        to: Option<String>,
    },
    /// Print the enrollment account derived for the wallet
    Address,
    /// Run the enrollment workflow
    Enroll {
        /// Which phases to run
        #[arg(long, value_enum, default_value_t = EnrollPhase::All)]
        phase: EnrollPhase,
        /// GitHub handle (overrides config)
        #[arg(long, env = "PREREQ_GITHUB")]
        github: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EnrollPhase {
    /// initialize, then submit_ts
    All,
    /// Only create the enrollment account
    Initialize,
    /// Only mint (the enrollment account must already exist)
    Submit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs)?;

    // Wallet utilities need no configuration or network
    match &args.command {
        Command::Keygen { out } => return keygen(out.as_deref()),
        Command::Base58ToWallet { private_key } => {
            let input = arg_or_stdin(private_key.clone(), "Input your private key as a base58 string:")?;
            let bytes = wallet::base58_to_wallet_bytes(&input)?;
            println!("Your wallet file format is:");
            println!("{}", wallet::wallet_bytes_to_json(&bytes));
            return Ok(());
        }
        Command::WalletToBase58 { wallet_json } => {
            let input = arg_or_stdin(
                wallet_json.clone(),
                "Input your private key as a JSON byte array (e.g. [12,34,...]):",
            )?;
            let bytes = wallet::parse_wallet_json(&input)?;
            println!("Your Base58-encoded private key is:");
            println!("{}", wallet::wallet_bytes_to_base58(&bytes));
            return Ok(());
        }
        _ => {}
    }

    info!("📋 Loading configuration from: {}", args.config);
    let mut config = load_config(&args.config)?;
    if let Some(url) = &args.rpc_url {
        config.rpc.url = url.clone();
    }
    if let Some(path) = &args.keypair {
        config.wallet.keypair_path = path.clone();
    }
    config.validate().context("Invalid configuration")?;

    let ledger: Arc<dyn LedgerClient> = Arc::new(RpcLedger::new(
        &config.rpc.url,
        config.commitment()?,
        config.poll_interval(),
    ));
    info!("🌐 RPC endpoint: {} ({})", config.rpc.url, config.rpc.cluster);
    let submitter = TransactionSubmitter::new(
        Arc::clone(&ledger),
        config.send_options()?,
        config.rpc.cluster.clone(),
    );
    let deadline = config.confirm_timeout();

    match args.command {
        Command::Airdrop { lamports } => {
            let wallet = load_wallet(&config.wallet.keypair_path)?;
            let lamports = lamports.unwrap_or(config.transfer.airdrop_lamports);
            let signature = ledger
                .request_airdrop(&wallet.pubkey(), lamports)
                .await
                .map_err(|e| WorkflowError::Rpc(e.to_string()))
                .context("Airdrop failed")?;
            info!(
                "Success! Check your TX here: {}",
                explorer_url(&signature, &config.rpc.cluster)
            );
        }
        Command::Transfer { lamports, to } => {
            let wallet = load_wallet(&config.wallet.keypair_path)?;
            if let Some(to) = to {
                config.transfer.destination = to;
            }
            let planner = TransferPlanner::new(submitter, wallet.signer(), config.destination()?);
            let receipt = report(with_deadline(deadline, planner.transfer(lamports)).await)?;
            info!("Transferred {} lamports to {}", receipt.amount, planner.destination());
        }
        Command::Drain { to } => {
            let wallet = load_wallet(&config.wallet.keypair_path)?;
            if let Some(to) = to {
                config.transfer.destination = to;
            }
            let planner = TransferPlanner::new(submitter, wallet.signer(), config.destination()?);
            let receipt = report(with_deadline(deadline, planner.drain()).await)?;
            info!(
                "Success! Entire balance transferred: {} lamports (fee {} lamports)",
                receipt.amount,
                receipt.fee.unwrap_or_default()
            );
        }
        Command::Address => {
            let wallet = load_wallet(config.enrollment_keypair_path())?;
            let accounts = config.enrollment_accounts()?;
            let (account, bump) = enrollment_address(&accounts.program_id, &wallet.pubkey())?;
            println!("User:        {}", wallet.pubkey());
            println!("Account PDA: {} (bump {})", account, bump);
            println!("Authority:   {} (configured)", accounts.authority);
        }
        Command::Enroll { phase, github } => {
            let wallet = load_wallet(config.enrollment_keypair_path())?;
            let github = github.unwrap_or_else(|| config.enrollment.github.clone());
            let accounts = config.enrollment_accounts()?;

            let mut orchestrator = if phase == EnrollPhase::Submit {
                EnrollmentOrchestrator::resume_submitted(submitter, wallet.signer(), accounts, github)?
            } else {
                EnrollmentOrchestrator::new(submitter, wallet.signer(), accounts, github)?
            };
            info!("Enrollment account: {}", orchestrator.enrollment_account());

            if phase != EnrollPhase::Submit {
                report(with_deadline(deadline, orchestrator.initialize()).await)
                    .context("Enrollment phase 'initialize' failed")?;
            }
            if phase != EnrollPhase::Initialize {
                let receipt = report(with_deadline(deadline, orchestrator.submit()).await)
                    .context("Enrollment phase 'submit_ts' failed; re-run with --phase submit")?;
                info!("Minted item: {}", receipt.mint);
            }
            info!("Enrollment state: {:?}", orchestrator.state());
        }
        Command::Keygen { .. } | Command::Base58ToWallet { .. } | Command::WalletToBase58 { .. } => {
            unreachable!("handled before configuration is loaded")
        }
    }

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = if verbose {
        "prereq=debug,prereq_client=debug,info"
    } else {
        "prereq=info,prereq_client=info,warn"
    };

    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| env_filter.into()),
    );
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        dotenvy::dotenv().ok();
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn load_wallet(path: &str) -> Result<WalletManager> {
    info!("🔑 Loading wallet from: {}", path);
    let wallet = WalletManager::from_file(path).context("Failed to load wallet")?;
    info!("💼 Wallet address: {}", wallet.pubkey());
    Ok(wallet)
}

fn keygen(out: Option<&str>) -> Result<()> {
    let wallet = WalletManager::generate();
    println!("You've generated a new Solana wallet: {}\n", wallet.pubkey());
    println!("To save your wallet, copy and paste the following into a JSON file:");
    println!("{}", wallet.to_wallet_json());
    if let Some(path) = out {
        wallet.save(path)?;
        info!("Wallet written to {}", path);
    }
    Ok(())
}

fn arg_or_stdin(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    println!("{}", prompt);
    let line = io::stdin()
        .lock()
        .lines()
        .next()
        .context("No input provided")??;
    Ok(line)
}

/// Apply the caller's deadline to a workflow; unbounded when `None`
async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, WorkflowError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            WorkflowError::rejected(format!(
                "no confirmation within {}s",
                limit.as_secs()
            ))
        })?,
        None => fut.await,
    }
}

/// Surface a workflow error with its nested cause payload
fn report<T>(result: Result<T, WorkflowError>) -> Result<T> {
    result.map_err(|err| {
        error!(category = err.category(), "Oops, something went wrong: {}", err);
        for detail in err.details() {
            error!("Error details: {}", detail);
        }
        anyhow::Error::new(err)
    })
}
