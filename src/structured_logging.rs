//! Structured logging for workflow events

use crate::observability::CorrelationId;
use crate::tx_builder::WorkflowError;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// Structured logger for one workflow invocation
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    correlation_id: CorrelationId,
    workflow: &'static str,
}

impl StructuredLogger {
    pub fn new(workflow: &'static str) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            workflow,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn log_phase_start(&self, phase: &str) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            phase = %phase,
            "Phase started"
        );
    }

    pub fn log_fee_quote(&self, balance: u64, fee: u64) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            balance = %balance,
            fee = %fee,
            "Fee quoted"
        );
    }

    pub fn log_transfer_planned(&self, destination: &Pubkey, lamports: u64) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            destination = %destination,
            lamports = %lamports,
            "Transfer planned"
        );
    }

    pub fn log_address(&self, label: &str, address: &Pubkey) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            label = %label,
            address = %address,
            "Account address"
        );
    }

    pub fn log_phase_success(&self, phase: &str, signature: &Signature, explorer_url: &str) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            phase = %phase,
            signature = %signature,
            explorer_url = %explorer_url,
            "Phase confirmed"
        );
    }

    pub fn log_phase_failure(&self, phase: &str, error: &WorkflowError) {
        tracing::error!(
            correlation_id = %self.correlation_id,
            workflow = %self.workflow,
            phase = %phase,
            category = %error.category(),
            error = %error,
            "Phase failed"
        );
        for detail in error.details() {
            tracing::error!(
                correlation_id = %self.correlation_id,
                phase = %phase,
                detail = %detail,
                "Error details"
            );
        }
    }
}
