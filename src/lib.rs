//! Solana prerequisite workflows
//!
//! Fee-aware wallet draining and the two-phase enrollment that mints a
//! collection-bound item, built on an injectable ledger client.

pub mod config;
pub mod enrollment;
pub mod ledger;
pub mod observability;
pub mod structured_logging;
pub mod test_utils;
pub mod transfer;
pub mod tx_builder;
pub mod wallet;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use enrollment::{EnrollmentOrchestrator, EnrollmentState};
pub use ledger::{LedgerClient, RpcLedger};
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
pub use transfer::{plan_drain_transfer, TransferPlanner};
pub use tx_builder::WorkflowError;
