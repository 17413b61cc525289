//! Error types for the transaction workflows
//!
//! Every fallible step of the transfer and enrollment workflows reports one of
//! these variants. Errors are:
//! - Informative: balances, fees and sizes travel with the error
//! - Verbatim: network causes and simulation logs are kept, never summarized
//! - Observable: each variant maps to a stable category for structured logs

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error type for all workflow operations
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// No bump seed in `[0, 255]` produced an off-curve address
    #[error("Program address derivation exhausted every bump seed (program={program})")]
    DerivationExhausted {
        /// Program the derivation was attempted against
        program: Pubkey,
    },

    /// Seed set violates the ledger's seed count or seed length limits
    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    /// The network could not price the probe message
    ///
    /// Raised when `getFeeForMessage` returns `null` (stale blockhash,
    /// malformed message) or when the query itself fails.
    #[error("Fee unavailable: {0}")]
    FeeUnavailable(String),

    /// The account cannot cover the transaction fee
    #[error("Insufficient balance to cover the transaction fee. Balance: {balance}, Fee: {fee}")]
    InsufficientBalance {
        /// Current balance in lamports
        balance: u64,
        /// Quoted fee in lamports
        fee: u64,
    },

    /// The signed transaction does not fit in a single packet
    #[error("Transaction too large: {size} bytes (max {max})")]
    TransactionTooLarge {
        /// Serialized size of the signed transaction
        size: usize,
        /// Network limit
        max: usize,
    },

    /// Simulation or execution failed on the network
    #[error("Submission rejected: {cause}")]
    SubmissionRejected {
        /// Cause reported by the network
        cause: String,
        /// Structured detail (program logs) when the network provides it
        details: Vec<String>,
    },

    /// Failed to fetch a recent blockhash
    #[error("Blockhash error: {0}")]
    Blockhash(String),

    /// Message compilation failed
    #[error("Message compile error: {0}")]
    Compile(String),

    /// Signer set does not match the message's required signers
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Read-only RPC call failed (balance, airdrop)
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Workflow step invoked from the wrong state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration or validation error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WorkflowError {
    /// Get the error category for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::DerivationExhausted { .. } | Self::InvalidSeeds(_) => "derivation",
            Self::FeeUnavailable(_) => "fee",
            Self::InsufficientBalance { .. } => "balance",
            Self::TransactionTooLarge { .. } => "size",
            Self::SubmissionRejected { .. } => "submission",
            Self::Blockhash(_) => "blockhash",
            Self::Compile(_) => "compile",
            Self::Signing(_) => "signing",
            Self::Rpc(_) => "rpc",
            Self::InvalidState(_) => "state",
            Self::Configuration(_) => "config",
        }
    }

    /// Nested cause payload, if the network attached one
    pub fn details(&self) -> &[String] {
        match self {
            Self::SubmissionRejected { details, .. } => details,
            _ => &[],
        }
    }
}

// Convenience constructors for common error scenarios
impl WorkflowError {
    /// Create a submission rejection without structured detail
    pub fn rejected(cause: impl Into<String>) -> Self {
        Self::SubmissionRejected {
            cause: cause.into(),
            details: Vec::new(),
        }
    }

    /// Create a fee unavailable error
    pub fn fee_unavailable(reason: impl Into<String>) -> Self {
        Self::FeeUnavailable(reason.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::InsufficientBalance {
            balance: 4_000,
            fee: 5_000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance to cover the transaction fee. Balance: 4000, Fee: 5000"
        );

        let err = WorkflowError::TransactionTooLarge {
            size: 1500,
            max: 1232,
        };
        assert_eq!(err.to_string(), "Transaction too large: 1500 bytes (max 1232)");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(WorkflowError::fee_unavailable("null").category(), "fee");
        assert_eq!(WorkflowError::rejected("boom").category(), "submission");
        assert_eq!(
            WorkflowError::DerivationExhausted {
                program: Pubkey::new_unique()
            }
            .category(),
            "derivation"
        );
    }

    #[test]
    fn test_rejection_details_are_kept() {
        let err = WorkflowError::SubmissionRejected {
            cause: "custom program error: 0x1".to_string(),
            details: vec!["Program log: already enrolled".to_string()],
        };
        assert_eq!(err.details().len(), 1);
        assert!(WorkflowError::rejected("x").details().is_empty());
    }
}
