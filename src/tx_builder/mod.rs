//! Transaction building and submission
//!
//! The pieces every workflow composes:
//! - **errors**: Error taxonomy shared by all workflows
//! - **derive**: Program-derived address derivation
//! - **instructions**: Transfer and enrollment instruction factories
//! - **message**: Immutable fluent message builder (v0 messages)
//! - **fee**: Network fee quotes for probe messages
//! - **submit**: Signing, size validation, send and confirm
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use prereq_client::tx_builder::{MessageBuilder, TransactionSubmitter, WorkflowError};
//!
//! # async fn example(submitter: TransactionSubmitter, keypair: solana_sdk::signature::Keypair,
//! #     ix: solana_sdk::instruction::Instruction) -> Result<(), WorkflowError> {
//! use solana_sdk::signer::Signer;
//!
//! let lifetime = submitter.latest_lifetime().await?;
//! let message = MessageBuilder::new()
//!     .with_fee_payer(keypair.pubkey())
//!     .with_lifetime(lifetime)
//!     .with_instructions([ix]);
//! let signature = submitter.submit(&message, &[&keypair]).await?;
//! # Ok(())
//! # }
//! ```

pub mod derive;
pub mod errors;
pub mod fee;
pub mod instructions;
pub mod message;
pub mod submit;

pub use derive::{derive_program_address, enrollment_address, ENROLLMENT_SEED};
pub use errors::WorkflowError;
pub use fee::{ensure_affordable, estimate_fee};
pub use instructions::{
    anchor_discriminator, initialize_instruction, submit_ts_instruction, system_program_id,
    transfer_instruction, InitializeAccounts, SubmitTsAccounts,
};
pub use message::MessageBuilder;
pub use submit::{check_transaction_size, explorer_url, TransactionSubmitter};
