//! Wallet management module
//!
//! Loads the signing keypair from a wallet file and converts between the
//! JSON byte-array wallet format and base58 private keys.

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::sync::Arc;

const KEYPAIR_LEN: usize = 64;

/// Wallet manager owning the process's signing keypair
#[derive(Clone)]
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Create a new wallet manager from a keypair file
    ///
    /// Accepts either a JSON byte array (`[12,34,...]`) or 64 raw bytes.
    pub fn from_file(path: &str) -> Result<Self> {
        let keypair_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keypair file: {}", path))?;

        if keypair_bytes.len() == KEYPAIR_LEN {
            return Self::from_bytes(&keypair_bytes);
        }
        let json: Vec<u8> =
            serde_json::from_slice(&keypair_bytes).context("Failed to parse keypair JSON")?;
        Self::from_bytes(&json)
    }

    /// Create a wallet manager from 64 secret+public key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEYPAIR_LEN {
            anyhow::bail!(
                "Invalid keypair length: expected {} bytes, got {}",
                KEYPAIR_LEN,
                bytes.len()
            );
        }
        if bytes.iter().all(|&b| b == 0) {
            anyhow::bail!("Invalid keypair: all-zero key rejected");
        }
        let keypair = Keypair::try_from(bytes).context("Invalid keypair bytes")?;
        Ok(Self::from_keypair(keypair))
    }

    /// Create a wallet manager from a base58-encoded private key
    pub fn from_base58(private_key: &str) -> Result<Self> {
        Self::from_bytes(&base58_to_wallet_bytes(private_key)?)
    }

    /// Create a new wallet manager from a keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Generate a brand new wallet
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::new())
    }

    /// Get the public key
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Shared signer handle for the workflows
    pub fn signer(&self) -> Arc<dyn Signer + Send + Sync> {
        self.keypair.clone()
    }

    /// Wallet bytes in the JSON byte-array file format
    pub fn to_wallet_json(&self) -> String {
        wallet_bytes_to_json(&self.keypair.to_bytes())
    }

    /// Write the wallet in the JSON byte-array file format
    pub fn save(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_wallet_json())
            .with_context(|| format!("Failed to write keypair file: {}", path))
    }
}

/// Decode a base58 private key into wallet bytes
pub fn base58_to_wallet_bytes(private_key: &str) -> Result<Vec<u8>> {
    bs58::decode(private_key.trim())
        .into_vec()
        .context("Invalid base58 private key")
}

/// Encode wallet bytes as a base58 private key
pub fn wallet_bytes_to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Parse a JSON byte array such as `[12, 34, ...]`
pub fn parse_wallet_json(input: &str) -> Result<Vec<u8>> {
    serde_json::from_str(input.trim()).context("Expected a JSON byte array like [12,34,...]")
}

/// Render wallet bytes as a JSON byte array
pub fn wallet_bytes_to_json(bytes: &[u8]) -> String {
    // Vec<u8> always serializes
    serde_json::to_string(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file_json_format() {
        let wallet = WalletManager::generate();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(wallet.to_wallet_json().as_bytes()).unwrap();

        let loaded = WalletManager::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.pubkey(), wallet.pubkey());
    }

    #[test]
    fn test_from_file_raw_format() {
        let keypair = Keypair::new();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&keypair.to_bytes()).unwrap();

        let loaded = WalletManager::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(WalletManager::from_file("/nonexistent/dev-wallet.json").is_err());
    }

    #[test]
    fn test_rejects_zero_and_short_keys() {
        assert!(WalletManager::from_bytes(&[0u8; 64]).is_err());
        assert!(WalletManager::from_bytes(&[1u8; 32]).is_err());
    }

    #[test]
    fn test_base58_conversion() {
        let wallet = WalletManager::generate();
        let bytes = parse_wallet_json(&wallet.to_wallet_json()).unwrap();
        let base58 = wallet_bytes_to_base58(&bytes);

        assert_eq!(base58_to_wallet_bytes(&base58).unwrap(), bytes);
        assert_eq!(WalletManager::from_base58(&base58).unwrap().pubkey(), wallet.pubkey());
    }

    #[test]
    fn test_parse_wallet_json_tolerates_whitespace() {
        assert_eq!(parse_wallet_json(" [1, 2,3 ]\n").unwrap(), vec![1, 2, 3]);
        assert!(parse_wallet_json("[1,2,300]").is_err());
        assert!(base58_to_wallet_bytes("0OIl").is_err());
    }
}
