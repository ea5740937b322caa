// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The verification protocol — "is this (letter number, code) pair valid?"
//
// Stateless and read-only: the letter is looked up through the storage
// seam, the expected code is recomputed, and the comparison result is
// mapped to a structured verdict. Storage failures surface as their own
// outcome so "could not be checked" is never mistaken for "forged".

use briefwerk_core::config::ValidationSecret;
use briefwerk_core::error::Result;
use briefwerk_core::types::{LetterNumber, LetterStatus, LetterType, PermissionLetter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tracing::{debug, error, warn};

use crate::derive::derive_code;
use crate::timestamp::{TimestampSource, select_reference_timestamp};

/// Storage seam: the one external collaborator of the protocol.
///
/// Implementations look a letter up by its exact number, restricted to
/// approved status. The protocol performs a single call with no retry — a
/// failed lookup is surfaced immediately rather than masked.
pub trait LetterDirectory {
    fn find_approved(&self, number: &LetterNumber) -> Result<Option<PermissionLetter>>;
}

impl<T: LetterDirectory + ?Sized> LetterDirectory for std::sync::Arc<T> {
    fn find_approved(&self, number: &LetterNumber) -> Result<Option<PermissionLetter>> {
        (**self).find_approved(number)
    }
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// No approved letter matches the number. Deliberately does not reveal
    /// whether the number exists in some other status.
    NotFoundOrNotApproved,
    /// Letter found, but the recomputed code disagrees with the submission.
    CodeMismatch,
    /// The letter record carries no usable timestamp, so no code can be
    /// recomputed for it.
    MissingReferenceTimestamp,
    /// Storage or computation failed — the document could not be checked.
    /// Not a judgement on the document's authenticity.
    InfrastructureFailure,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFoundOrNotApproved => "not_found_or_not_approved",
            Self::CodeMismatch => "code_mismatch",
            Self::MissingReferenceTimestamp => "missing_reference_timestamp",
            Self::InfrastructureFailure => "infrastructure_failure",
        }
    }

    /// Message shown to the person verifying the document.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFoundOrNotApproved => "Letter number not found or not approved",
            Self::CodeMismatch => {
                "Validation code does not match — the document may have been altered or forged"
            }
            Self::MissingReferenceTimestamp => {
                "This letter cannot be verified — its record is incomplete"
            }
            Self::InfrastructureFailure => {
                "Verification could not be completed — please try again"
            }
        }
    }
}

/// Read-only projection of a letter returned to a successful verifier.
///
/// Never includes the secret, the expected code, or record internals.
#[derive(Debug, Clone, Serialize)]
pub struct LetterDisclosure {
    pub letter_number: String,
    pub activity: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub letter_type: LetterType,
    pub status: LetterStatus,
    pub participant_count: usize,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl LetterDisclosure {
    fn from_letter(letter: &PermissionLetter) -> Self {
        Self {
            letter_number: letter.letter_number.to_string(),
            activity: letter.activity.clone(),
            location: letter.location.clone(),
            date: letter.date,
            letter_type: letter.letter_type,
            status: letter.status,
            participant_count: letter.participant_count(),
            created_by: letter.created_by.clone(),
            approved_by: letter.approved_by.clone(),
            approved_at: letter.approved_at,
            created_at: letter.created_at,
        }
    }
}

/// Structured verification verdict.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure: Option<LetterDisclosure>,
}

impl VerificationReport {
    fn valid(disclosure: LetterDisclosure) -> Self {
        Self {
            valid: true,
            message: "Document is valid and authentic".into(),
            reason: None,
            disclosure: Some(disclosure),
        }
    }

    fn rejected(reason: RejectionReason) -> Self {
        Self {
            valid: false,
            message: reason.user_message().into(),
            reason: Some(reason),
            disclosure: None,
        }
    }
}

/// Normalize a submitted code: strip all whitespace, uppercase.
///
/// Codes are transcribed from paper; embedded spaces and lowercase typing
/// must not fail an otherwise correct submission.
fn normalize_submission(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Constant-time equality over the expected and submitted codes.
fn codes_match(expected: &str, submitted: &str) -> bool {
    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}

/// The externally visible verification operation.
pub struct DocumentVerifier<D> {
    directory: D,
    secret: ValidationSecret,
}

impl<D: LetterDirectory> DocumentVerifier<D> {
    pub fn new(directory: D, secret: ValidationSecret) -> Self {
        Self { directory, secret }
    }

    /// Check a submitted (letter number, code) pair.
    ///
    /// Read-only; never mutates letter state. All failures are mapped to a
    /// structured report — nothing propagates to the caller as an error.
    pub fn verify(&self, letter_number: &str, submitted_code: &str) -> VerificationReport {
        let submitted = normalize_submission(submitted_code);
        let number = LetterNumber::from(letter_number.trim());

        let letter = match self.directory.find_approved(&number) {
            Ok(Some(letter)) => letter,
            Ok(None) => {
                debug!(number = %number, "no approved letter for submitted number");
                return VerificationReport::rejected(RejectionReason::NotFoundOrNotApproved);
            }
            Err(err) => {
                // Infrastructure detail is logged server-side; the verifier
                // only learns that the check could not be completed.
                error!(number = %number, error = %err, "letter lookup failed during verification");
                return VerificationReport::rejected(RejectionReason::InfrastructureFailure);
            }
        };

        let reference = match select_reference_timestamp(&TimestampSource::from(&letter)) {
            Ok(reference) => reference,
            Err(_) => {
                warn!(number = %number, "letter has no reference timestamp — unverifiable");
                return VerificationReport::rejected(RejectionReason::MissingReferenceTimestamp);
            }
        };

        let expected = derive_code(&letter.id, reference.instant(), &self.secret);

        if codes_match(&expected, &submitted) {
            debug!(number = %number, "verification succeeded");
            VerificationReport::valid(LetterDisclosure::from_letter(&letter))
        } else {
            // The submitted and expected codes are intentionally not logged.
            debug!(number = %number, "submitted code does not match");
            VerificationReport::rejected(RejectionReason::CodeMismatch)
        }
    }
}
