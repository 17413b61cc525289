//! Fee estimation
//!
//! Fees are priced by the network per signature and per compute unit, so the
//! only authoritative quote comes from `getFeeForMessage`. The estimator
//! compiles an unsigned probe message (built from zero-value instructions so
//! nothing is moved while probing) and asks the network to price it.

use crate::ledger::{BlockhashLifetime, LedgerClient};
use crate::tx_builder::errors::WorkflowError;
use crate::tx_builder::message::MessageBuilder;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

/// Quote the fee of a message built from `probe_instructions`
pub async fn estimate_fee(
    ledger: &dyn LedgerClient,
    payer: &Pubkey,
    probe_instructions: Vec<Instruction>,
    lifetime: &BlockhashLifetime,
) -> Result<u64, WorkflowError> {
    let message = MessageBuilder::new()
        .with_fee_payer(*payer)
        .with_lifetime(*lifetime)
        .with_instructions(probe_instructions)
        .compile()?;
    let encoded = BASE64_STANDARD.encode(message.serialize());

    let quote = ledger
        .get_fee_for_message(&encoded)
        .await
        .map_err(|e| WorkflowError::fee_unavailable(e.to_string()))?;

    match quote {
        Some(fee) => {
            debug!(fee = fee, payer = %payer, "Fee quoted for probe message");
            Ok(fee)
        }
        None => Err(WorkflowError::fee_unavailable(
            "Unable to calculate transaction fee",
        )),
    }
}

/// Fail with `InsufficientBalance` unless `balance` covers `fee`
pub fn ensure_affordable(balance: u64, fee: u64) -> Result<(), WorkflowError> {
    if balance < fee {
        return Err(WorkflowError::InsufficientBalance { balance, fee });
    }
    Ok(())
}
