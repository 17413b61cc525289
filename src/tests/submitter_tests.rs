//! TransactionSubmitter tests
//!
//! Covers signing, the pre-send size check and rejection reporting.

use crate::ledger::{LedgerClient, LedgerError, SendOptions};
use crate::test_utils::MockLedger;
use crate::tx_builder::{
    check_transaction_size, transfer_instruction, MessageBuilder, TransactionSubmitter,
    WorkflowError,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::{AccountMeta, Instruction},
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};
use std::sync::Arc;

fn submitter_for(ledger: Arc<MockLedger>) -> TransactionSubmitter {
    TransactionSubmitter::new(ledger, SendOptions::default(), "devnet")
}

async fn transfer_message(ledger: &MockLedger, payer: &Keypair) -> MessageBuilder {
    let lifetime = ledger.get_latest_blockhash().await.unwrap();
    MessageBuilder::new()
        .with_fee_payer(payer.pubkey())
        .with_lifetime(lifetime)
        .with_instructions([transfer_instruction(&payer.pubkey(), &Pubkey::new_unique(), 42)])
}

#[tokio::test]
async fn test_submit_signs_and_confirms() {
    let ledger = Arc::new(MockLedger::new());
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    let signature = submitter.submit(&message, &[&payer]).await.expect("Should submit");

    let sent = ledger.sent_transactions().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].signatures[0], signature);
    assert!(signature.verify(payer.pubkey().as_ref(), &sent[0].message.serialize()));
}

#[tokio::test]
async fn test_submit_uses_configured_commitment() {
    let ledger = Arc::new(MockLedger::new());
    let options = SendOptions {
        commitment: CommitmentConfig::finalized(),
        skip_preflight: true,
    };
    let submitter = TransactionSubmitter::new(ledger.clone(), options, "devnet");
    let payer = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    submitter.submit(&message, &[&payer]).await.unwrap();

    assert_eq!(ledger.sent_options().await, vec![options]);
}

#[tokio::test]
async fn test_missing_signer_fails_before_send() {
    let ledger = Arc::new(MockLedger::new());
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let stranger = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    let result = submitter.submit(&message, &[&stranger]).await;

    assert!(matches!(result, Err(WorkflowError::Signing(_))));
    assert!(ledger.sent_transactions().await.is_empty());
}

#[tokio::test]
async fn test_oversized_transaction_rejected_before_network() {
    let ledger = Arc::new(MockLedger::new());
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let lifetime = ledger.get_latest_blockhash().await.unwrap();

    let bulky = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &vec![0xAB; PACKET_DATA_SIZE],
        vec![AccountMeta::new(payer.pubkey(), true)],
    );
    let message = MessageBuilder::new()
        .with_fee_payer(payer.pubkey())
        .with_lifetime(lifetime)
        .with_instructions([bulky]);

    let result = submitter.submit(&message, &[&payer]).await;

    match result {
        Err(WorkflowError::TransactionTooLarge { size, max }) => {
            assert!(size > max);
            assert_eq!(max, PACKET_DATA_SIZE);
        }
        other => panic!("Expected TransactionTooLarge, got {:?}", other),
    }
    assert!(ledger.sent_transactions().await.is_empty());
}

#[tokio::test]
async fn test_regular_transfer_fits_in_packet() {
    let ledger = Arc::new(MockLedger::new());
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    let tx = submitter.sign(&message, &[&payer]).unwrap();
    let size = check_transaction_size(&tx).unwrap();
    assert!(size <= PACKET_DATA_SIZE);
}

#[tokio::test]
async fn test_network_rejection_is_surfaced_with_details() {
    let ledger = Arc::new(MockLedger::new());
    ledger
        .fail_next_send(LedgerError::RpcResponse {
            endpoint: "mock".to_string(),
            message: "Transaction simulation failed: Error processing Instruction 0".to_string(),
            code: Some(-32002),
            logs: vec!["Program log: custom program error: 0x1".to_string()],
        })
        .await;
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    let err = submitter.submit(&message, &[&payer]).await.unwrap_err();

    match err {
        WorkflowError::SubmissionRejected { cause, details } => {
            assert!(cause.contains("Transaction simulation failed"));
            assert_eq!(details, vec!["Program log: custom program error: 0x1".to_string()]);
        }
        other => panic!("Expected SubmissionRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_blockhash_is_rejection() {
    let ledger = Arc::new(MockLedger::new());
    ledger
        .fail_next_send(LedgerError::BlockhashExpired {
            blockhash: "stale".to_string(),
        })
        .await;
    let submitter = submitter_for(ledger.clone());
    let payer = Keypair::new();
    let message = transfer_message(&ledger, &payer).await;

    let result = submitter.submit(&message, &[&payer]).await;
    assert!(matches!(result, Err(WorkflowError::SubmissionRejected { .. })));
}
