// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory letter registry.
//
// The reference implementation of the `LetterDirectory` storage seam.
// Embedders with a real database implement the same trait; the engine,
// its tests, and small deployments use this registry as-is. Deliberately
// not a relational store — records live in process memory behind a Mutex.

use std::sync::Mutex;

use briefwerk_core::error::{BriefwerkError, Result};
use briefwerk_core::types::{
    LetterDraft, LetterId, LetterNumber, LetterStatus, PermissionLetter,
};
use chrono::{Datelike, Utc};
use tracing::{debug, info};

use briefwerk_verify::LetterDirectory;

use crate::lifecycle;
use crate::numbering::next_letter_number;

/// Mutex-protected in-memory letter store.
pub struct LetterRegistry {
    letters: Mutex<Vec<PermissionLetter>>,
}

impl Default for LetterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterRegistry {
    pub fn new() -> Self {
        Self {
            letters: Mutex::new(Vec::new()),
        }
    }

    /// Create a pending letter from a draft, assigning the next number in
    /// the current month.
    pub fn create(&self, draft: LetterDraft) -> Result<PermissionLetter> {
        validate_draft(&draft)?;

        let mut letters = self.letters.lock().expect("registry lock poisoned");

        let now = Utc::now();
        let last_in_month = letters
            .iter()
            .filter(|l| {
                l.created_at
                    .is_some_and(|c| c.year() == now.year() && c.month() == now.month())
            })
            .max_by_key(|l| l.created_at)
            .map(|l| l.letter_number.clone());

        let number = next_letter_number(last_in_month.as_ref(), now);
        let letter = PermissionLetter::new(number, draft);

        info!(number = %letter.letter_number, "letter created");
        letters.push(letter.clone());
        Ok(letter)
    }

    /// Look a letter up by its number, regardless of status.
    pub fn find_by_number(&self, number: &LetterNumber) -> Option<PermissionLetter> {
        self.letters
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .find(|l| &l.letter_number == number)
            .cloned()
    }

    /// Look a letter up by its opaque identity.
    pub fn find_by_id(&self, id: &LetterId) -> Option<PermissionLetter> {
        self.letters
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .find(|l| &l.id == id)
            .cloned()
    }

    /// All letters, newest first.
    pub fn all_letters(&self) -> Vec<PermissionLetter> {
        let mut letters = self
            .letters
            .lock()
            .expect("registry lock poisoned")
            .clone();
        letters.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        letters
    }

    /// Approve the letter with the given number.
    pub fn approve(&self, number: &LetterNumber, approver: &str) -> Result<PermissionLetter> {
        self.update(number, |letter| {
            lifecycle::approve(letter, approver, Utc::now());
        })
    }

    /// Reject the letter with the given number.
    pub fn reject(&self, number: &LetterNumber, approver: &str) -> Result<PermissionLetter> {
        self.update(number, |letter| {
            lifecycle::reject(letter, approver, Utc::now());
        })
    }

    /// Send a decided letter back to pending.
    pub fn revert_to_pending(&self, number: &LetterNumber) -> Result<PermissionLetter> {
        self.update(number, |letter| {
            lifecycle::revert_to_pending(letter, Utc::now());
        })
    }

    fn update(
        &self,
        number: &LetterNumber,
        apply: impl FnOnce(&mut PermissionLetter),
    ) -> Result<PermissionLetter> {
        let mut letters = self.letters.lock().expect("registry lock poisoned");
        let letter = letters
            .iter_mut()
            .find(|l| &l.letter_number == number)
            .ok_or_else(|| BriefwerkError::LetterNotFound(number.to_string()))?;

        apply(letter);
        debug!(number = %number, status = letter.status.as_str(), "letter updated");
        Ok(letter.clone())
    }
}

impl LetterDirectory for LetterRegistry {
    fn find_approved(&self, number: &LetterNumber) -> Result<Option<PermissionLetter>> {
        Ok(self
            .letters
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .find(|l| &l.letter_number == number && l.status == LetterStatus::Approved)
            .cloned())
    }
}

/// Check the fields a requester must fill.
fn validate_draft(draft: &LetterDraft) -> Result<()> {
    if draft.activity.trim().is_empty() {
        return Err(BriefwerkError::InvalidLetter("activity is required".into()));
    }
    if draft.location.trim().is_empty() {
        return Err(BriefwerkError::InvalidLetter("location is required".into()));
    }
    if draft.time_start.trim().is_empty() || draft.time_end.trim().is_empty() {
        return Err(BriefwerkError::InvalidLetter(
            "start and end times are required".into(),
        ));
    }
    if draft.participants.is_empty() {
        return Err(BriefwerkError::InvalidLetter(
            "at least one participant is required".into(),
        ));
    }
    Ok(())
}
