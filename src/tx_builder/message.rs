//! Immutable transaction message builder
//!
//! Each stage consumes the builder and returns the next state, so a message
//! reads as a chain:
//!
//! ```rust,no_run
//! # use prereq_client::tx_builder::MessageBuilder;
//! # use prereq_client::ledger::BlockhashLifetime;
//! # fn example(payer: solana_sdk::pubkey::Pubkey, lifetime: BlockhashLifetime, ix: solana_sdk::instruction::Instruction) {
//! let message = MessageBuilder::new()
//!     .with_fee_payer(payer)
//!     .with_lifetime(lifetime)
//!     .with_instructions([ix])
//!     .compile();
//! # }
//! ```

use crate::ledger::BlockhashLifetime;
use crate::tx_builder::errors::WorkflowError;
use solana_sdk::{
    instruction::Instruction,
    message::{v0::Message as MessageV0, VersionedMessage},
    pubkey::Pubkey,
};

#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    fee_payer: Option<Pubkey>,
    lifetime: Option<BlockhashLifetime>,
    instructions: Vec<Instruction>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fee payer (also the first required signer)
    pub fn with_fee_payer(self, fee_payer: Pubkey) -> Self {
        Self {
            fee_payer: Some(fee_payer),
            ..self
        }
    }

    /// Set the recent-blockhash lifetime
    pub fn with_lifetime(self, lifetime: BlockhashLifetime) -> Self {
        Self {
            lifetime: Some(lifetime),
            ..self
        }
    }

    /// Append instructions after any already present
    pub fn with_instructions(self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        let mut all = self.instructions;
        all.extend(instructions);
        Self {
            instructions: all,
            ..self
        }
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.fee_payer.as_ref()
    }

    pub fn lifetime(&self) -> Option<&BlockhashLifetime> {
        self.lifetime.as_ref()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Compile into a v0 message (no address lookup tables)
    pub fn compile(&self) -> Result<VersionedMessage, WorkflowError> {
        let fee_payer = self
            .fee_payer
            .ok_or_else(|| WorkflowError::Compile("fee payer not set".to_string()))?;
        let lifetime = self
            .lifetime
            .ok_or_else(|| WorkflowError::Compile("blockhash lifetime not set".to_string()))?;
        if self.instructions.is_empty() {
            return Err(WorkflowError::Compile("message has no instructions".to_string()));
        }

        let message = MessageV0::try_compile(&fee_payer, &self.instructions, &[], lifetime.blockhash)
            .map_err(|e| WorkflowError::Compile(e.to_string()))?;
        Ok(VersionedMessage::V0(message))
    }
}
