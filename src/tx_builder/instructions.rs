//! Instruction factories
//!
//! Builders for the three instructions the workflows send:
//! 1. System `transfer` (drain and fixed-amount transfers)
//! 2. Enrollment program `initialize` (creates the enrollment account)
//! 3. Enrollment program `submit_ts` (mints the collection item)
//!
//! The enrollment program is an Anchor program: instruction data starts with
//! an 8-byte discriminator `sha256("global:<name>")[..8]` followed by the
//! Borsh-encoded arguments.

use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Anchor instruction name for account initialization
pub const INITIALIZE_IX_NAME: &str = "initialize";

/// Anchor instruction name for the TypeScript-track submission
pub const SUBMIT_TS_IX_NAME: &str = "submit_ts";

/// Compute the Anchor discriminator for a global instruction
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

/// Address of the native system program
#[allow(deprecated)]
pub fn system_program_id() -> Pubkey {
    solana_sdk::system_program::id()
}

/// Build a system transfer of exactly `lamports` from `source` to `destination`
#[allow(deprecated)]
pub fn transfer_instruction(source: &Pubkey, destination: &Pubkey, lamports: u64) -> Instruction {
    solana_sdk::system_instruction::transfer(source, destination, lamports)
}

/// Accounts for the `initialize` instruction
///
/// Roles, in order:
/// - `user`: signer, writable (pays for the account)
/// - `account`: writable, the enrollment PDA
/// - `system_program`: read-only
#[derive(Debug, Clone, Copy)]
pub struct InitializeAccounts {
    pub user: Pubkey,
    pub account: Pubkey,
    pub system_program: Pubkey,
}

/// Build the `initialize` instruction carrying the operator's GitHub handle
pub fn initialize_instruction(
    program_id: &Pubkey,
    accounts: &InitializeAccounts,
    github: &str,
) -> Instruction {
    let mut data = Vec::with_capacity(8 + 4 + github.len());
    data.extend_from_slice(&anchor_discriminator(INITIALIZE_IX_NAME));
    // Borsh string: u32 little-endian length prefix, then UTF-8 bytes
    data.extend_from_slice(&(github.len() as u32).to_le_bytes());
    data.extend_from_slice(github.as_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.user, true),
            AccountMeta::new(accounts.account, false),
            AccountMeta::new_readonly(accounts.system_program, false),
        ],
        data,
    }
}

/// Accounts for the `submit_ts` instruction
///
/// Roles, in order:
/// - `user`: signer, writable
/// - `account`: writable, the enrollment PDA created by `initialize`
/// - `mint`: signer, writable, the freshly generated item keypair
/// - `collection`: writable
/// - `authority`: read-only PDA of the enrollment program
/// - `mpl_core_program`: read-only
/// - `system_program`: read-only
#[derive(Debug, Clone, Copy)]
pub struct SubmitTsAccounts {
    pub user: Pubkey,
    pub account: Pubkey,
    pub mint: Pubkey,
    pub collection: Pubkey,
    pub authority: Pubkey,
    pub mpl_core_program: Pubkey,
    pub system_program: Pubkey,
}

/// Build the `submit_ts` instruction; requires both `user` and `mint` signatures
pub fn submit_ts_instruction(program_id: &Pubkey, accounts: &SubmitTsAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.user, true),
            AccountMeta::new(accounts.account, false),
            AccountMeta::new(accounts.mint, true),
            AccountMeta::new(accounts.collection, false),
            AccountMeta::new_readonly(accounts.authority, false),
            AccountMeta::new_readonly(accounts.mpl_core_program, false),
            AccountMeta::new_readonly(accounts.system_program, false),
        ],
        data: anchor_discriminator(SUBMIT_TS_IX_NAME).to_vec(),
    }
}
