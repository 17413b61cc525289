//! Program-derived address derivation
//!
//! Walks bump seeds from 255 down to 0 and accepts the first candidate that
//! falls off the ed25519 curve, the same search the runtime performs.

use crate::tx_builder::errors::WorkflowError;
use solana_sdk::pubkey::{Pubkey, PubkeyError, MAX_SEEDS, MAX_SEED_LEN};

/// Seed prefix of the enrollment account
pub const ENROLLMENT_SEED: &[u8] = b"prereqs";

/// Derive `(address, bump)` for `seeds` under `program_id`
pub fn derive_program_address(
    program_id: &Pubkey,
    seeds: &[&[u8]],
) -> Result<(Pubkey, u8), WorkflowError> {
    // One slot is reserved for the bump seed
    if seeds.len() >= MAX_SEEDS {
        return Err(WorkflowError::InvalidSeeds(format!(
            "{} seeds given, at most {} allowed",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }
    if let Some((idx, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(WorkflowError::InvalidSeeds(format!(
            "seed {} is {} bytes, at most {} allowed",
            idx,
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut candidate: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        candidate.extend_from_slice(seeds);
        candidate.push(&bump_seed);

        match Pubkey::create_program_address(&candidate, program_id) {
            Ok(address) => return Ok((address, bump)),
            // On-curve: try the next bump
            Err(PubkeyError::InvalidSeeds) => continue,
            Err(e) => return Err(WorkflowError::InvalidSeeds(e.to_string())),
        }
    }

    Err(WorkflowError::DerivationExhausted {
        program: *program_id,
    })
}

/// Enrollment account of `signer`: seeds `("prereqs", signer)`
pub fn enrollment_address(
    program_id: &Pubkey,
    signer: &Pubkey,
) -> Result<(Pubkey, u8), WorkflowError> {
    derive_program_address(program_id, &[ENROLLMENT_SEED, signer.as_ref()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_runtime_derivation() {
        let program_id = Pubkey::new_unique();
        let signer = Pubkey::new_unique();

        let derived = enrollment_address(&program_id, &signer).expect("Should derive");
        let expected =
            Pubkey::find_program_address(&[ENROLLMENT_SEED, signer.as_ref()], &program_id);

        assert_eq!(derived, expected);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let seeds: &[&[u8]] = &[b"authority"];

        let first = derive_program_address(&program_id, seeds).unwrap();
        for _ in 0..10 {
            assert_eq!(derive_program_address(&program_id, seeds).unwrap(), first);
        }
    }

    #[test]
    fn test_derived_address_is_off_curve() {
        let program_id = Pubkey::new_unique();
        let (address, _) = derive_program_address(&program_id, &[b"prereqs"]).unwrap();
        assert!(!address.is_on_curve());
    }

    #[test]
    fn test_different_signers_get_different_accounts() {
        let program_id = Pubkey::new_unique();
        let (a, _) = enrollment_address(&program_id, &Pubkey::new_unique()).unwrap();
        let (b, _) = enrollment_address(&program_id, &Pubkey::new_unique()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_oversized_seed() {
        let program_id = Pubkey::new_unique();
        let long_seed = [7u8; MAX_SEED_LEN + 1];

        let result = derive_program_address(&program_id, &[&long_seed]);
        assert!(matches!(result, Err(WorkflowError::InvalidSeeds(_))));
    }

    #[test]
    fn test_rejects_too_many_seeds() {
        let program_id = Pubkey::new_unique();
        let seed: &[u8] = b"s";
        let seeds = vec![seed; MAX_SEEDS];

        let result = derive_program_address(&program_id, &seeds);
        assert!(matches!(result, Err(WorkflowError::InvalidSeeds(_))));
    }

    #[test]
    fn test_empty_seed_set_is_valid() {
        let program_id = Pubkey::new_unique();
        let derived = derive_program_address(&program_id, &[]).unwrap();
        assert_eq!(derived, Pubkey::find_program_address(&[], &program_id));
    }
}
