//! Two-phase enrollment
//!
//! ```text
//!  Init ──initialize confirmed──▶ Submitted ──submit_ts confirmed──▶ Done
//! ```
//!
//! Phase 2 depends on the account phase 1 creates, so the phases run
//! strictly in order. A failed phase leaves the state where it was; phase 1
//! is never undone. Each phase fetches its own blockhash right before
//! building its message. The GitHub handle is only checked by `initialize`,
//! so a resumed enrollment can run phase 2 without one.
//!
//! The authority account passed to `submit_ts` is a configured constant. The
//! program derives it from a seed set that a local single-seed derivation
//! (`"authority"`) does not reproduce, so it is not recomputed here.

use crate::structured_logging::StructuredLogger;
use crate::tx_builder::{
    enrollment_address, explorer_url, initialize_instruction, submit_ts_instruction,
    InitializeAccounts, MessageBuilder, SubmitTsAccounts, TransactionSubmitter, WorkflowError,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::sync::Arc;

/// Where an enrollment currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    /// Enrollment account not yet created
    Init,
    /// Enrollment account confirmed; item not yet minted
    Submitted,
    /// Item minted
    Done,
}

/// Fixed accounts of the enrollment program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentAccounts {
    pub program_id: Pubkey,
    pub collection: Pubkey,
    /// Authority PDA as the program expects it; supplied, never derived
    pub authority: Pubkey,
    pub mpl_core_program: Pubkey,
    pub system_program: Pubkey,
}

/// Result of a confirmed `submit_ts` phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub signature: Signature,
    /// Address of the newly minted item
    pub mint: Pubkey,
}

/// Result of an enrollment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentReceipt {
    /// `None` when the run resumed from `Submitted`
    pub initialize_signature: Option<Signature>,
    pub submit: SubmitReceipt,
}

/// Sequences the initialize and submit transactions for one signer
pub struct EnrollmentOrchestrator {
    submitter: TransactionSubmitter,
    signer: Arc<dyn Signer + Send + Sync>,
    accounts: EnrollmentAccounts,
    github: String,
    enrollment_account: Pubkey,
    state: EnrollmentState,
    logger: StructuredLogger,
}

impl EnrollmentOrchestrator {
    /// Start a fresh enrollment in the `Init` state
    pub fn new(
        submitter: TransactionSubmitter,
        signer: Arc<dyn Signer + Send + Sync>,
        accounts: EnrollmentAccounts,
        github: impl Into<String>,
    ) -> Result<Self, WorkflowError> {
        let github = github.into();
        let (enrollment_account, _bump) =
            enrollment_address(&accounts.program_id, &signer.pubkey())?;

        Ok(Self {
            submitter,
            signer,
            accounts,
            github,
            enrollment_account,
            state: EnrollmentState::Init,
            logger: StructuredLogger::new("enrollment"),
        })
    }

    /// Resume an enrollment whose account already exists on chain
    pub fn resume_submitted(
        submitter: TransactionSubmitter,
        signer: Arc<dyn Signer + Send + Sync>,
        accounts: EnrollmentAccounts,
        github: impl Into<String>,
    ) -> Result<Self, WorkflowError> {
        let mut orchestrator = Self::new(submitter, signer, accounts, github)?;
        orchestrator.state = EnrollmentState::Submitted;
        Ok(orchestrator)
    }

    pub fn state(&self) -> EnrollmentState {
        self.state
    }

    /// The signer's enrollment PDA
    pub fn enrollment_account(&self) -> &Pubkey {
        &self.enrollment_account
    }

    pub fn accounts(&self) -> &EnrollmentAccounts {
        &self.accounts
    }

    /// Phase 1: create the enrollment account
    pub async fn initialize(&mut self) -> Result<Signature, WorkflowError> {
        if self.state != EnrollmentState::Init {
            return Err(WorkflowError::invalid_state(format!(
                "initialize requires Init, enrollment is {:?}",
                self.state
            )));
        }
        if self.github.trim().is_empty() {
            return Err(WorkflowError::Configuration(
                "GitHub handle must not be empty".to_string(),
            ));
        }
        self.logger.log_phase_start("initialize");

        match self.send_initialize().await {
            Ok(signature) => {
                self.state = EnrollmentState::Submitted;
                self.logger.log_phase_success(
                    "initialize",
                    &signature,
                    &explorer_url(&signature, self.submitter.cluster()),
                );
                Ok(signature)
            }
            Err(err) => {
                self.logger.log_phase_failure("initialize", &err);
                Err(err)
            }
        }
    }

    async fn send_initialize(&self) -> Result<Signature, WorkflowError> {
        let user = self.signer.pubkey();
        let ix = initialize_instruction(
            &self.accounts.program_id,
            &InitializeAccounts {
                user,
                account: self.enrollment_account,
                system_program: self.accounts.system_program,
            },
            &self.github,
        );

        let lifetime = self.submitter.latest_lifetime().await?;
        let message = MessageBuilder::new()
            .with_fee_payer(user)
            .with_lifetime(lifetime)
            .with_instructions([ix]);

        self.submitter
            .submit(&message, &[self.signer.as_ref()])
            .await
    }

    /// Phase 2: mint the collection item with a freshly generated keypair
    pub async fn submit(&mut self) -> Result<SubmitReceipt, WorkflowError> {
        if self.state != EnrollmentState::Submitted {
            return Err(WorkflowError::invalid_state(format!(
                "submit requires Submitted, enrollment is {:?}",
                self.state
            )));
        }
        self.logger.log_phase_start("submit_ts");

        let mint = Keypair::new();
        self.log_accounts(&mint.pubkey());

        match self.send_submit(&mint).await {
            Ok(signature) => {
                self.state = EnrollmentState::Done;
                self.logger.log_phase_success(
                    "submit_ts",
                    &signature,
                    &explorer_url(&signature, self.submitter.cluster()),
                );
                Ok(SubmitReceipt {
                    signature,
                    mint: mint.pubkey(),
                })
            }
            Err(err) => {
                self.logger.log_phase_failure("submit_ts", &err);
                Err(err)
            }
        }
    }

    async fn send_submit(&self, mint: &Keypair) -> Result<Signature, WorkflowError> {
        let user = self.signer.pubkey();
        let ix = submit_ts_instruction(
            &self.accounts.program_id,
            &SubmitTsAccounts {
                user,
                account: self.enrollment_account,
                mint: mint.pubkey(),
                collection: self.accounts.collection,
                authority: self.accounts.authority,
                mpl_core_program: self.accounts.mpl_core_program,
                system_program: self.accounts.system_program,
            },
        );

        let lifetime = self.submitter.latest_lifetime().await?;
        let message = MessageBuilder::new()
            .with_fee_payer(user)
            .with_lifetime(lifetime)
            .with_instructions([ix]);

        // Main signer pays; the item keypair co-signs as the new asset
        self.submitter
            .submit(&message, &[self.signer.as_ref(), mint])
            .await
    }

    /// Run every remaining phase in order
    pub async fn run(&mut self) -> Result<EnrollmentReceipt, WorkflowError> {
        let initialize_signature = match self.state {
            EnrollmentState::Init => Some(self.initialize().await?),
            EnrollmentState::Submitted => None,
            EnrollmentState::Done => {
                return Err(WorkflowError::invalid_state("enrollment is already Done"));
            }
        };
        let submit = self.submit().await?;
        Ok(EnrollmentReceipt {
            initialize_signature,
            submit,
        })
    }

    fn log_accounts(&self, mint: &Pubkey) {
        self.logger.log_address("user", &self.signer.pubkey());
        self.logger.log_address("account", &self.enrollment_account);
        self.logger.log_address("mint", mint);
        self.logger.log_address("collection", &self.accounts.collection);
        self.logger.log_address("authority", &self.accounts.authority);
    }
}
