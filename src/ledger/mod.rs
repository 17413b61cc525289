//! Ledger client module
//!
//! The RPC and confirmation surface the workflows consume. The production
//! implementation wraps the nonblocking Solana RPC client; tests use the
//! in-memory ledger from `test_utils`.

use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::VersionedTransaction,
};

pub mod ledger_errors;
pub mod rpc_ledger;

pub use ledger_errors::LedgerError;
pub use rpc_ledger::RpcLedger;

/// A recent blockhash together with the last block height it stays valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashLifetime {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Options applied when sending a signed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Commitment level to wait for before the send is considered settled
    pub commitment: CommitmentConfig,
    /// Skip the preflight simulation on the RPC node
    pub skip_preflight: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            skip_preflight: false,
        }
    }
}

/// Network collaborator for balance, blockhash, fee and submission queries
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of `address` in lamports
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    /// Latest blockhash and its validity window
    async fn get_latest_blockhash(&self) -> Result<BlockhashLifetime, LedgerError>;

    /// Fee for a base64-encoded compiled message; `None` when the network cannot price it
    async fn get_fee_for_message(&self, message_base64: &str) -> Result<Option<u64>, LedgerError>;

    /// Send a signed transaction and wait until `options.commitment` is reached
    async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, LedgerError>;

    /// Request an airdrop of `lamports` to `address` (devnet/testnet only)
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64)
        -> Result<Signature, LedgerError>;
}
