//! Balance-draining and fixed-amount transfers
//!
//! Draining sends `balance - fee` so the account ends at exactly zero. The
//! fee is quoted for a zero-amount probe transfer built against the same
//! blockhash the real transfer uses; the real transfer has the same shape,
//! so it prices identically.

use crate::structured_logging::StructuredLogger;
use crate::tx_builder::{
    ensure_affordable, estimate_fee, explorer_url, transfer_instruction, MessageBuilder,
    TransactionSubmitter, WorkflowError,
};
use crate::ledger::BlockhashLifetime;
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Signature, signer::Signer,
};
use std::sync::Arc;

/// Amount to send so that `balance` is fully spent after paying `fee`
pub fn plan_drain_transfer(balance: u64, fee: u64) -> Result<u64, WorkflowError> {
    ensure_affordable(balance, fee)?;
    balance
        .checked_sub(fee)
        .ok_or(WorkflowError::InsufficientBalance { balance, fee })
}

/// A drain transfer ready to be signed
#[derive(Debug, Clone)]
pub struct DrainPlan {
    pub balance: u64,
    pub fee: u64,
    pub amount: u64,
    pub lifetime: BlockhashLifetime,
    pub instruction: Instruction,
}

/// Outcome of a confirmed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub amount: u64,
    pub fee: Option<u64>,
}

/// Moves lamports from the signer's account to a fixed destination
pub struct TransferPlanner {
    submitter: TransactionSubmitter,
    signer: Arc<dyn Signer + Send + Sync>,
    destination: Pubkey,
    logger: StructuredLogger,
}

impl TransferPlanner {
    pub fn new(
        submitter: TransactionSubmitter,
        signer: Arc<dyn Signer + Send + Sync>,
        destination: Pubkey,
    ) -> Self {
        Self {
            submitter,
            signer,
            destination,
            logger: StructuredLogger::new("transfer"),
        }
    }

    pub fn destination(&self) -> &Pubkey {
        &self.destination
    }

    /// Quote the fee and compute the drain amount without sending anything
    pub async fn plan_drain(&self) -> Result<DrainPlan, WorkflowError> {
        let source = self.signer.pubkey();
        let ledger = self.submitter.ledger();

        let balance = ledger
            .get_balance(&source)
            .await
            .map_err(|e| WorkflowError::Rpc(e.to_string()))?;
        let lifetime = self.submitter.latest_lifetime().await?;

        let probe = transfer_instruction(&source, &self.destination, 0);
        let fee = estimate_fee(ledger, &source, vec![probe], &lifetime).await?;
        self.logger.log_fee_quote(balance, fee);

        let amount = plan_drain_transfer(balance, fee)?;
        self.logger.log_transfer_planned(&self.destination, amount);

        Ok(DrainPlan {
            balance,
            fee,
            amount,
            lifetime,
            instruction: transfer_instruction(&source, &self.destination, amount),
        })
    }

    /// Send the whole balance minus the fee to the destination
    pub async fn drain(&self) -> Result<TransferReceipt, WorkflowError> {
        self.logger.log_phase_start("drain");
        let result = self.drain_inner().await;
        if let Err(err) = &result {
            self.logger.log_phase_failure("drain", err);
        }
        result
    }

    async fn drain_inner(&self) -> Result<TransferReceipt, WorkflowError> {
        let plan = self.plan_drain().await?;
        let message = MessageBuilder::new()
            .with_fee_payer(self.signer.pubkey())
            .with_lifetime(plan.lifetime)
            .with_instructions([plan.instruction]);

        let signature = self
            .submitter
            .submit(&message, &[self.signer.as_ref()])
            .await?;
        self.logger.log_phase_success(
            "drain",
            &signature,
            &explorer_url(&signature, self.submitter.cluster()),
        );

        Ok(TransferReceipt {
            signature,
            amount: plan.amount,
            fee: Some(plan.fee),
        })
    }

    /// Send exactly `lamports` to the destination
    pub async fn transfer(&self, lamports: u64) -> Result<TransferReceipt, WorkflowError> {
        self.logger.log_phase_start("transfer");
        let result = self.transfer_inner(lamports).await;
        if let Err(err) = &result {
            self.logger.log_phase_failure("transfer", err);
        }
        result
    }

    async fn transfer_inner(&self, lamports: u64) -> Result<TransferReceipt, WorkflowError> {
        let source = self.signer.pubkey();
        let lifetime = self.submitter.latest_lifetime().await?;
        self.logger.log_transfer_planned(&self.destination, lamports);

        let message = MessageBuilder::new()
            .with_fee_payer(source)
            .with_lifetime(lifetime)
            .with_instructions([transfer_instruction(&source, &self.destination, lamports)]);

        let signature = self
            .submitter
            .submit(&message, &[self.signer.as_ref()])
            .await?;
        self.logger.log_phase_success(
            "transfer",
            &signature,
            &explorer_url(&signature, self.submitter.cluster()),
        );

        Ok(TransferReceipt {
            signature,
            amount: lamports,
            fee: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plan_drain_scenario() {
        assert_eq!(plan_drain_transfer(1_000_000, 5_000).unwrap(), 995_000);
    }

    #[test]
    fn test_plan_drain_balance_equals_fee() {
        assert_eq!(plan_drain_transfer(5_000, 5_000).unwrap(), 0);
    }

    #[test]
    fn test_plan_drain_insufficient() {
        let err = plan_drain_transfer(4_999, 5_000).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InsufficientBalance {
                balance: 4_999,
                fee: 5_000
            }
        ));
    }

    #[test]
    fn test_plan_drain_extremes() {
        assert_eq!(plan_drain_transfer(u64::MAX, 0).unwrap(), u64::MAX);
        assert_eq!(plan_drain_transfer(u64::MAX, u64::MAX).unwrap(), 0);
        assert!(plan_drain_transfer(0, 1).is_err());
    }

    proptest! {
        #[test]
        fn prop_drain_is_exact_difference(fee in any::<u64>(), extra in any::<u64>()) {
            let balance = fee.saturating_add(extra);
            let amount = plan_drain_transfer(balance, fee).unwrap();
            prop_assert_eq!(amount + fee, balance);
        }

        #[test]
        fn prop_drain_rejects_short_balance(balance in 0u64..u64::MAX, gap in 1u64..1_000_000) {
            let fee = balance.saturating_add(gap);
            prop_assume!(fee > balance);
            let is_insufficient = matches!(
                plan_drain_transfer(balance, fee),
                Err(WorkflowError::InsufficientBalance { .. })
            );
            prop_assert!(is_insufficient);
        }
    }
}
