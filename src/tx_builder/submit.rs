//! Transaction submission
//!
//! Pipeline: compile → sign with every required signer → size check →
//! send and wait for the configured commitment. The size check runs before
//! any network call so an oversized transaction never costs a round trip.

use crate::ledger::{BlockhashLifetime, LedgerClient, LedgerError, SendOptions};
use crate::tx_builder::errors::WorkflowError;
use crate::tx_builder::message::MessageBuilder;
use solana_sdk::{
    packet::PACKET_DATA_SIZE,
    signature::Signature,
    signer::Signer,
    transaction::VersionedTransaction,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Explorer link for a transaction signature
pub fn explorer_url(signature: &Signature, cluster: &str) -> String {
    if cluster == "mainnet-beta" {
        format!("https://explorer.solana.com/tx/{}", signature)
    } else {
        format!("https://explorer.solana.com/tx/{}?cluster={}", signature, cluster)
    }
}

/// Serialized size of a signed transaction, rejected if it exceeds one packet
pub fn check_transaction_size(transaction: &VersionedTransaction) -> Result<usize, WorkflowError> {
    let size = bincode::serialized_size(transaction)
        .map_err(|e| WorkflowError::Compile(format!("Failed to size transaction: {}", e)))?
        as usize;
    if size > PACKET_DATA_SIZE {
        return Err(WorkflowError::TransactionTooLarge {
            size,
            max: PACKET_DATA_SIZE,
        });
    }
    Ok(size)
}

/// Convert a send/confirm failure into a rejection carrying the network's cause
pub fn rejection_from_ledger(err: LedgerError) -> WorkflowError {
    WorkflowError::SubmissionRejected {
        details: err.logs().to_vec(),
        cause: err.to_string(),
    }
}

/// Signs, validates and submits transactions against a ledger
#[derive(Clone)]
pub struct TransactionSubmitter {
    ledger: Arc<dyn LedgerClient>,
    options: SendOptions,
    cluster: String,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn LedgerClient>, options: SendOptions, cluster: impl Into<String>) -> Self {
        Self {
            ledger,
            options,
            cluster: cluster.into(),
        }
    }

    pub fn ledger(&self) -> &dyn LedgerClient {
        self.ledger.as_ref()
    }

    pub fn options(&self) -> SendOptions {
        self.options
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Fetch a fresh blockhash lifetime for a new message
    pub async fn latest_lifetime(&self) -> Result<BlockhashLifetime, WorkflowError> {
        self.ledger
            .get_latest_blockhash()
            .await
            .map_err(|e| WorkflowError::Blockhash(e.to_string()))
    }

    /// Compile and sign `message` without sending it
    pub fn sign(
        &self,
        message: &MessageBuilder,
        signers: &[&dyn Signer],
    ) -> Result<VersionedTransaction, WorkflowError> {
        let compiled = message.compile()?;
        VersionedTransaction::try_new(compiled, signers)
            .map_err(|e| WorkflowError::Signing(e.to_string()))
    }

    /// Compile, sign, size-check, send and confirm `message`
    pub async fn submit(
        &self,
        message: &MessageBuilder,
        signers: &[&dyn Signer],
    ) -> Result<Signature, WorkflowError> {
        let transaction = self.sign(message, signers)?;
        let size = check_transaction_size(&transaction)?;
        debug!(
            size = size,
            signers = signers.len(),
            commitment = ?self.options.commitment.commitment,
            "Submitting transaction"
        );

        let signature = self
            .ledger
            .send_and_confirm(&transaction, self.options)
            .await
            .map_err(rejection_from_ledger)?;

        info!(
            signature = %signature,
            "Success! Check out your TX here: {}",
            explorer_url(&signature, &self.cluster)
        );
        Ok(signature)
    }
}
