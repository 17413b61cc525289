//! Integration tests for the public prereq-client API
//!
//! These tests validate:
//! - Enrollment address derivation matches the runtime's search
//! - Drain amount planning
//! - Enrollment instruction layout
//! - Config files and wallet files round-trip through disk

use prereq_client::config::Config;
use prereq_client::tx_builder::{
    anchor_discriminator, derive_program_address, enrollment_address, initialize_instruction,
    system_program_id, InitializeAccounts, ENROLLMENT_SEED,
};
use prereq_client::wallet::{self, WalletManager};
use prereq_client::{plan_drain_transfer, WorkflowError};
use solana_sdk::pubkey::Pubkey;
use std::io::Write;
use std::str::FromStr;

#[test]
fn test_enrollment_address_matches_runtime_search() {
    let program_id = Pubkey::from_str("TRBZyQHB3m68FGeVsqTK39Wm4xejadjVhP5MAZaKWDM").unwrap();
    let signer = Pubkey::new_unique();

    let (address, bump) = enrollment_address(&program_id, &signer).unwrap();
    let expected =
        Pubkey::find_program_address(&[ENROLLMENT_SEED, signer.as_ref()], &program_id);

    assert_eq!((address, bump), expected);
    assert!(!address.is_on_curve());
}

#[test]
fn test_derivation_is_deterministic_per_signer() {
    let program_id = Pubkey::new_unique();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();

    let first = enrollment_address(&program_id, &a).unwrap();
    assert_eq!(first, enrollment_address(&program_id, &a).unwrap());
    assert_ne!(first.0, enrollment_address(&program_id, &b).unwrap().0);
}

#[test]
fn test_oversized_seed_is_rejected() {
    let program_id = Pubkey::new_unique();
    let long_seed = [7u8; 33];

    let result = derive_program_address(&program_id, &[&long_seed]);
    assert!(matches!(result, Err(WorkflowError::InvalidSeeds(_))));
}

#[test]
fn test_drain_planning() {
    assert_eq!(plan_drain_transfer(1_000_000, 5_000).unwrap(), 995_000);
    assert_eq!(plan_drain_transfer(5_000, 5_000).unwrap(), 0);
    assert!(matches!(
        plan_drain_transfer(100, 5_000),
        Err(WorkflowError::InsufficientBalance { .. })
    ));
}

#[test]
fn test_initialize_instruction_layout() {
    let program_id = Pubkey::new_unique();
    let user = Pubkey::new_unique();
    let (account, _) = enrollment_address(&program_id, &user).unwrap();

    let ix = initialize_instruction(
        &program_id,
        &InitializeAccounts {
            user,
            account,
            system_program: system_program_id(),
        },
        "octocat",
    );

    let mut expected = anchor_discriminator("initialize").to_vec();
    expected.extend_from_slice(&7u32.to_le_bytes());
    expected.extend_from_slice(b"octocat");
    assert_eq!(ix.data, expected);

    assert_eq!(ix.accounts.len(), 3);
    assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
    assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    assert!(!ix.accounts[2].is_writable);
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[rpc]
url = "http://127.0.0.1:8899"
cluster = "custom"
skip_preflight = true

[transfer]
destination = "{}"
"#,
        Pubkey::new_unique()
    )
    .unwrap();

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.rpc.cluster, "custom");
    assert!(config.send_options().unwrap().skip_preflight);
    assert_eq!(config.enrollment.github, "");
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = Config::from_file("/nonexistent/prereq/config.toml");
    assert!(result.is_err());
}

#[test]
fn test_wallet_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev-wallet.json");
    let path = path.to_str().unwrap();

    let wallet = WalletManager::generate();
    wallet.save(path).unwrap();

    let loaded = WalletManager::from_file(path).unwrap();
    assert_eq!(loaded.pubkey(), wallet.pubkey());
}

#[test]
fn test_base58_and_wallet_bytes_agree() {
    let wallet = WalletManager::generate();
    let bytes = wallet::parse_wallet_json(&wallet.to_wallet_json()).unwrap();
    let encoded = wallet::wallet_bytes_to_base58(&bytes);

    assert_eq!(wallet::base58_to_wallet_bytes(&encoded).unwrap(), bytes);
    assert_eq!(WalletManager::from_base58(&encoded).unwrap().pubkey(), wallet.pubkey());
}
