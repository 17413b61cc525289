//! Workflow tests against the in-memory ledger

mod submitter_tests;
