//! Test Utilities Module
//!
//! In-memory ledger for deterministic workflow tests. No network calls are
//! made; every query and submission is recorded for later assertions.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use crate::ledger::{BlockhashLifetime, LedgerClient, LedgerError, SendOptions};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Mock ledger for testing
///
/// - Balances are looked up per address (unknown addresses hold 0)
/// - The fee quote is fixed (or `None` to simulate an unpriceable message)
/// - Every blockhash request returns a new unique blockhash
/// - Queued send failures are returned in order before any success
pub struct MockLedger {
    balances: Mutex<HashMap<Pubkey, u64>>,
    fee: Mutex<Option<u64>>,
    fee_queries: Mutex<Vec<String>>,
    sent: Mutex<Vec<(VersionedTransaction, SendOptions)>>,
    send_failures: Mutex<VecDeque<LedgerError>>,
    airdrops: Mutex<Vec<(Pubkey, u64)>>,
    blockhash_requests: AtomicU64,
    balance_queries: AtomicUsize,
}

impl MockLedger {
    /// Create a ledger with no balances and a 5000-lamport fee quote
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            fee: Mutex::new(Some(5_000)),
            fee_queries: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            send_failures: Mutex::new(VecDeque::new()),
            airdrops: Mutex::new(Vec::new()),
            blockhash_requests: AtomicU64::new(0),
            balance_queries: AtomicUsize::new(0),
        }
    }

    /// Set the balance of `address`
    pub fn with_balance(self, address: Pubkey, lamports: u64) -> Self {
        self.balances.try_lock().expect("fresh mock").insert(address, lamports);
        self
    }

    /// Set the fee quote returned for every message
    pub fn with_fee(self, fee: Option<u64>) -> Self {
        *self.fee.try_lock().expect("fresh mock") = fee;
        self
    }

    /// Queue a failure for the next `send_and_confirm` call
    pub async fn fail_next_send(&self, err: LedgerError) {
        self.send_failures.lock().await.push_back(err);
    }

    /// Base64 messages passed to `get_fee_for_message`, in order
    pub async fn fee_queries(&self) -> Vec<String> {
        self.fee_queries.lock().await.clone()
    }

    pub async fn fee_query_count(&self) -> usize {
        self.fee_queries.lock().await.len()
    }

    /// Transactions that were confirmed, in order
    pub async fn sent_transactions(&self) -> Vec<VersionedTransaction> {
        self.sent.lock().await.iter().map(|(tx, _)| tx.clone()).collect()
    }

    /// Options used for each confirmed transaction, in order
    pub async fn sent_options(&self) -> Vec<SendOptions> {
        self.sent.lock().await.iter().map(|(_, opts)| *opts).collect()
    }

    pub async fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.airdrops.lock().await.clone()
    }

    pub fn blockhash_requests(&self) -> u64 {
        self.blockhash_requests.load(Ordering::SeqCst)
    }

    pub fn balance_queries(&self) -> usize {
        self.balance_queries.load(Ordering::SeqCst)
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        self.balance_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.balances.lock().await.get(address).copied().unwrap_or(0))
    }

    async fn get_latest_blockhash(&self) -> Result<BlockhashLifetime, LedgerError> {
        let n = self.blockhash_requests.fetch_add(1, Ordering::SeqCst);
        Ok(BlockhashLifetime {
            blockhash: Hash::new_unique(),
            last_valid_block_height: 1_000 + n,
        })
    }

    async fn get_fee_for_message(&self, message_base64: &str) -> Result<Option<u64>, LedgerError> {
        self.fee_queries.lock().await.push(message_base64.to_string());
        Ok(*self.fee.lock().await)
    }

    async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, LedgerError> {
        if let Some(err) = self.send_failures.lock().await.pop_front() {
            return Err(err);
        }
        self.sent.lock().await.push((transaction.clone(), options));
        Ok(transaction.signatures[0])
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        self.airdrops.lock().await.push((*address, lamports));
        let mut balances = self.balances.lock().await;
        *balances.entry(*address).or_insert(0) += lamports;
        Ok(Signature::from([1u8; 64]))
    }
}
