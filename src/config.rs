//! Configuration module
//!
//! This module handles configuration loading from TOML files and
//! environment variables, and converts string settings into typed values.

use crate::enrollment::EnrollmentAccounts;
use crate::ledger::SendOptions;
use serde::{Deserialize, Serialize};
use crate::tx_builder::system_program_id;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Transfer configuration
    #[serde(default)]
    pub transfer: TransferConfig,

    /// Enrollment program configuration
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Cluster name used for explorer links
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Commitment level to wait for (processed, confirmed, finalized)
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Skip the RPC node's preflight simulation
    #[serde(default)]
    pub skip_preflight: bool,

    /// Confirmation polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Deadline for a whole workflow in seconds (unbounded when absent)
    #[serde(default)]
    pub confirm_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Destination of transfers and drains
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Default airdrop amount in lamports
    #[serde(default = "default_airdrop_lamports")]
    pub airdrop_lamports: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    /// Keypair used for enrollment (falls back to `wallet.keypair_path`)
    #[serde(default)]
    pub keypair_path: Option<String>,

    /// GitHub handle recorded by `initialize`
    #[serde(default)]
    pub github: String,

    #[serde(default = "default_program_id")]
    pub program_id: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Authority PDA the program expects; not re-derived locally
    #[serde(default = "default_authority")]
    pub authority: String,

    #[serde(default = "default_mpl_core_program")]
    pub mpl_core_program: String,
}

// Default value functions
fn default_rpc_url() -> String { "https://api.devnet.solana.com".to_string() }
fn default_cluster() -> String { "devnet".to_string() }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_poll_interval_ms() -> u64 { 500 }
fn default_keypair_path() -> String { "dev-wallet.json".to_string() }
fn default_destination() -> String { "E7xuUu76d3aza4PKAw1t6RnMJho4HFoRAKeUAjJhPbUt".to_string() }
fn default_airdrop_lamports() -> u64 { 2_000_000_000 }
fn default_program_id() -> String { "TRBZyQHB3m68FGeVsqTK39Wm4xejadjVhP5MAZaKWDM".to_string() }
fn default_collection() -> String { "5ebsp5RChCGK7ssRZMVMufgVZhd2kFbNaotcZ5UvytN2".to_string() }
fn default_authority() -> String { "5xstXUdRJKxRrqbJuo5SAfKf68y7afoYwTeH1FXbsA3k".to_string() }
fn default_mpl_core_program() -> String { "CoREENxT6tW1HoK8ypY1SxRMZTcVPm7R94rH4PZNhX7d".to_string() }

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            cluster: default_cluster(),
            commitment: default_commitment(),
            skip_preflight: false,
            poll_interval_ms: default_poll_interval_ms(),
            confirm_timeout_secs: None,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            airdrop_lamports: default_airdrop_lamports(),
        }
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            keypair_path: None,
            github: String::new(),
            program_id: default_program_id(),
            collection: default_collection(),
            authority: default_authority(),
            mpl_core_program: default_mpl_core_program(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            wallet: WalletConfig::default(),
            transfer: TransferConfig::default(),
            enrollment: EnrollmentConfig::default(),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file {}: {}", path, e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration with `.env` and environment variable overrides
    pub fn from_file_with_env(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `PREREQ_RPC_URL`, `PREREQ_KEYPAIR` and `PREREQ_GITHUB`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PREREQ_RPC_URL") {
            self.rpc.url = url;
        }
        if let Ok(path) = std::env::var("PREREQ_KEYPAIR") {
            self.wallet.keypair_path = path;
        }
        if let Ok(github) = std::env::var("PREREQ_GITHUB") {
            self.enrollment.github = github;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc.url.starts_with("http://") && !self.rpc.url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "Invalid URL format: {}",
                self.rpc.url
            )));
        }
        if self.rpc.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be > 0".to_string(),
            ));
        }
        if self.rpc.confirm_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "confirm_timeout_secs must be > 0 when set".to_string(),
            ));
        }
        self.commitment()?;
        self.destination()?;
        self.enrollment_accounts()?;
        Ok(())
    }

    pub fn commitment(&self) -> Result<CommitmentConfig, ConfigError> {
        CommitmentConfig::from_str(&self.rpc.commitment).map_err(|_| {
            ConfigError::ValidationError(format!(
                "Unknown commitment level: {}",
                self.rpc.commitment
            ))
        })
    }

    pub fn send_options(&self) -> Result<SendOptions, ConfigError> {
        Ok(SendOptions {
            commitment: self.commitment()?,
            skip_preflight: self.rpc.skip_preflight,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.rpc.poll_interval_ms)
    }

    pub fn confirm_timeout(&self) -> Option<Duration> {
        self.rpc.confirm_timeout_secs.map(Duration::from_secs)
    }

    pub fn destination(&self) -> Result<Pubkey, ConfigError> {
        parse_pubkey("transfer.destination", &self.transfer.destination)
    }

    /// Keypair file used for enrollment
    pub fn enrollment_keypair_path(&self) -> &str {
        self.enrollment
            .keypair_path
            .as_deref()
            .unwrap_or(&self.wallet.keypair_path)
    }

    pub fn enrollment_accounts(&self) -> Result<EnrollmentAccounts, ConfigError> {
        Ok(EnrollmentAccounts {
            program_id: parse_pubkey("enrollment.program_id", &self.enrollment.program_id)?,
            collection: parse_pubkey("enrollment.collection", &self.enrollment.collection)?,
            authority: parse_pubkey("enrollment.authority", &self.enrollment.authority)?,
            mpl_core_program: parse_pubkey(
                "enrollment.mpl_core_program",
                &self.enrollment.mpl_core_program,
            )?,
            system_program: system_program_id(),
        })
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim())
        .map_err(|e| ConfigError::ValidationError(format!("Invalid {} '{}': {}", field, value, e)))
}
