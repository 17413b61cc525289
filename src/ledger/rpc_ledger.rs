//! RPC-backed ledger client

use super::{BlockhashLifetime, LedgerClient, LedgerError, SendOptions};
use async_trait::async_trait;
use serde_json::json;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::{
    config::RpcSendTransactionConfig,
    request::RpcRequest,
    response::Response,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::VersionedTransaction,
};
use std::time::Duration;
use tracing::debug;

/// Ledger client talking to a single JSON-RPC endpoint
pub struct RpcLedger {
    client: RpcClient,
    endpoint: String,
    commitment: CommitmentConfig,
    poll_interval: Duration,
}

impl RpcLedger {
    /// Create a client for `url` using `commitment` for reads
    pub fn new(url: &str, commitment: CommitmentConfig, poll_interval: Duration) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.to_string(), commitment),
            endpoint: url.to_string(),
            commitment,
            poll_interval,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_err(&self, err: solana_rpc_client_api::client_error::Error) -> LedgerError {
        LedgerError::from_client_error(err, &self.endpoint)
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn get_latest_blockhash(&self) -> Result<BlockhashLifetime, LedgerError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(BlockhashLifetime {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn get_fee_for_message(&self, message_base64: &str) -> Result<Option<u64>, LedgerError> {
        // Raw request: the typed helper turns a null fee into an error
        let response: Response<Option<u64>> = self
            .client
            .send(
                RpcRequest::GetFeeForMessage,
                json!([message_base64, { "commitment": self.commitment.commitment }]),
            )
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(response.value)
    }

    async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, LedgerError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(options.commitment.commitment),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self
            .client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| self.map_err(e))?;
        debug!(signature = %signature, endpoint = %self.endpoint, "Transaction sent, awaiting confirmation");

        let blockhash = *transaction.message.recent_blockhash();
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(&signature, options.commitment)
                .await
                .map_err(|e| self.map_err(e))?;
            match status {
                Some(Ok(())) => return Ok(signature),
                Some(Err(tx_err)) => return Err(LedgerError::TransactionFailed(tx_err.to_string())),
                None => {}
            }

            let still_valid = self
                .client
                .is_blockhash_valid(&blockhash, CommitmentConfig::processed())
                .await
                .map_err(|e| self.map_err(e))?;
            if !still_valid {
                // It may have landed between the two queries
                let last = self
                    .client
                    .get_signature_status_with_commitment(&signature, options.commitment)
                    .await
                    .map_err(|e| self.map_err(e))?;
                if let Some(result) = last {
                    return result
                        .map(|()| signature)
                        .map_err(|tx_err| LedgerError::TransactionFailed(tx_err.to_string()));
                }
                return Err(LedgerError::BlockhashExpired {
                    blockhash: blockhash.to_string(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        self.client
            .request_airdrop(address, lamports)
            .await
            .map_err(|e| self.map_err(e))
    }
}
