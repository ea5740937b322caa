// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — wires the registry, verifier, verification log,
// and renderer pool behind one cheaply-cloneable handle.
//
// The rusqlite-backed VerificationLog is `Send` but not `Sync`, so it is
// wrapped in `Arc<Mutex<>>` for safe sharing. Contention is minimal — a
// verification insert is a sub-millisecond SQLite write.

use std::sync::{Arc, Mutex};

use briefwerk_core::config::{AppConfig, ValidationSecret};
use briefwerk_core::error::{BriefwerkError, Result};
use briefwerk_core::types::{LetterDraft, LetterNumber, PermissionLetter};
use tracing::{error, info};

use briefwerk_document::render::{HtmlRenderer, RendererPool};
use briefwerk_document::render_permission_letter;
use briefwerk_verify::{
    DocumentVerifier, VerificationEntry, VerificationLog, VerificationReport,
};

use crate::registry::LetterRegistry;

/// Shared application services.
///
/// All fields are Arc-wrapped so the struct can be passed into closures
/// and async blocks without lifetime issues.
#[derive(Clone)]
pub struct LetterServices {
    registry: Arc<LetterRegistry>,
    verifier: Arc<DocumentVerifier<Arc<LetterRegistry>>>,
    verification_log: Arc<Mutex<VerificationLog>>,
    renderer: Arc<RendererPool>,
    config: Arc<AppConfig>,
    secret: ValidationSecret,
}

impl LetterServices {
    /// Assemble the service layer.
    ///
    /// `renderer_factory` launches the black-box HTML→PDF capability; the
    /// pool created here enforces the configured idle timeout.
    pub fn new(
        config: AppConfig,
        secret: ValidationSecret,
        verification_log: VerificationLog,
        renderer_factory: impl Fn() -> Result<Box<dyn HtmlRenderer>> + Send + Sync + 'static,
    ) -> Self {
        if secret.is_fallback() {
            // ValidationSecret already warned; repeat at service level so
            // the notice lands in every deployment's startup log.
            tracing::warn!("running with the built-in fallback validation secret");
        }

        let registry = Arc::new(LetterRegistry::new());
        let renderer = Arc::new(RendererPool::new(
            renderer_factory,
            std::time::Duration::from_secs(config.renderer_idle_timeout_secs),
        ));
        let verifier = Arc::new(DocumentVerifier::new(
            Arc::clone(&registry),
            secret.clone(),
        ));

        info!("letter services initialised");

        Self {
            registry,
            verifier,
            verification_log: Arc::new(Mutex::new(verification_log)),
            renderer,
            config: Arc::new(config),
            secret,
        }
    }

    // -- Letters -------------------------------------------------------------

    /// Create a pending letter from a draft.
    pub fn create_letter(&self, draft: LetterDraft) -> Result<PermissionLetter> {
        self.registry.create(draft)
    }

    /// Approve a letter; the approval instant becomes its reference
    /// timestamp for validation codes.
    pub fn approve_letter(&self, number: &LetterNumber, approver: &str) -> Result<PermissionLetter> {
        let letter = self.registry.approve(number, approver)?;
        info!(number = %number, approver, "letter approved");
        Ok(letter)
    }

    /// Reject a letter.
    pub fn reject_letter(&self, number: &LetterNumber, approver: &str) -> Result<PermissionLetter> {
        let letter = self.registry.reject(number, approver)?;
        info!(number = %number, approver, "letter rejected");
        Ok(letter)
    }

    /// Send a decided letter back to pending. Codes printed from the old
    /// approval stop verifying.
    pub fn revert_letter(&self, number: &LetterNumber) -> Result<PermissionLetter> {
        self.registry.revert_to_pending(number)
    }

    /// Look a letter up by number, regardless of status.
    pub fn find_letter(&self, number: &LetterNumber) -> Option<PermissionLetter> {
        self.registry.find_by_number(number)
    }

    /// All letters, newest first.
    pub fn all_letters(&self) -> Vec<PermissionLetter> {
        self.registry.all_letters()
    }

    // -- Documents -----------------------------------------------------------

    /// Render an approved letter to PDF bytes.
    pub fn render_letter_pdf(&self, number: &LetterNumber) -> Result<Vec<u8>> {
        let letter = self
            .registry
            .find_by_number(number)
            .ok_or_else(|| BriefwerkError::LetterNotFound(number.to_string()))?;

        render_permission_letter(
            &letter,
            &self.config.school,
            &self.config.verification_base_url,
            &self.secret,
            &self.renderer,
        )
    }

    /// The renderer pool, for spawning the idle reaper or shutting down.
    pub fn renderer(&self) -> &Arc<RendererPool> {
        &self.renderer
    }

    // -- Verification --------------------------------------------------------

    /// Verify a submitted (letter number, code) pair and record the
    /// attempt in the audit trail.
    pub fn verify_document(&self, letter_number: &str, code: &str) -> VerificationReport {
        let report = self.verifier.verify(letter_number, code);

        if self.config.audit_enabled {
            let outcome = report
                .reason
                .map(|r| r.as_str())
                .unwrap_or("valid");
            self.audit(letter_number.trim(), outcome, report.valid);
        }

        report
    }

    /// Record a verification attempt (convenience wrapper). Codes are
    /// never part of the entry.
    fn audit(&self, letter_number: &str, outcome: &str, success: bool) {
        if let Ok(log) = self.verification_log.lock()
            && let Err(e) = log.record(letter_number, outcome, success, None)
        {
            error!(error = %e, "failed to record verification attempt");
        }
    }

    /// Most recent verification attempts, newest first.
    pub fn recent_verifications(&self, limit: u32) -> Result<Vec<VerificationEntry>> {
        let log = self.verification_log.lock().expect("audit lock poisoned");
        log.recent_entries(limit)
    }

    /// Verification history for one letter number.
    pub fn verification_history(&self, letter_number: &str) -> Result<Vec<VerificationEntry>> {
        let log = self.verification_log.lock().expect("audit lock poisoned");
        log.entries_for_number(letter_number)
    }

    /// Total recorded verification attempts.
    pub fn verification_count(&self) -> Result<u64> {
        let log = self.verification_log.lock().expect("audit lock poisoned");
        log.count()
    }

    // -- Config --------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
