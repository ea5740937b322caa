// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for office staff and letter holders.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity levels drive how an embedding product presents the problem.

use crate::error::BriefwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Infrastructure hiccup — safe to retry.
    Transient,
    /// User or operator must do something (fix the record, set the secret).
    ActionRequired,
    /// Cannot be fixed by retrying — the document or data is wrong.
    Permanent,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the operation is worth retrying as-is.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `BriefwerkError` into a `HumanError` a school clerk can act on.
pub fn humanize_error(err: &BriefwerkError) -> HumanError {
    match err {
        // -- Verification --
        BriefwerkError::MissingReferenceTimestamp => HumanError {
            message: "This letter has no usable timestamp.".into(),
            suggestion: "The record is missing both its approval and its creation time, \
                         so no validation code can be computed for it. The letter record \
                         needs to be corrected before it can be verified or printed."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BriefwerkError::Lookup(detail) => HumanError {
            message: "The letter could not be looked up right now.".into(),
            suggestion: format!("Please try again in a moment. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Letters --
        BriefwerkError::LetterNotApproved { number } => HumanError {
            message: format!("Letter {number} has not been approved yet."),
            suggestion: "Only approved letters can be printed with a validation code. \
                         Ask an administrator to review it first."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BriefwerkError::LetterNotFound(number) => HumanError {
            message: format!("No letter with number {number} was found."),
            suggestion: "Check the number for typos — it appears on the printed document \
                         under the heading."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BriefwerkError::InvalidLetter(detail) => HumanError {
            message: "The letter is missing required information.".into(),
            suggestion: format!("Complete the form and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Documents --
        BriefwerkError::Render(_) | BriefwerkError::RendererUnavailable(_) => HumanError {
            message: "The PDF could not be generated.".into(),
            suggestion: "Try again in a moment. If this keeps happening, the document \
                         renderer may need to be restarted."
                .into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BriefwerkError::QrEncoding(_) => HumanError {
            message: "The scannable code could not be generated.".into(),
            suggestion: "The letter can still be printed — the validation code is shown \
                         as text. Try regenerating the PDF to get the scannable code."
                .into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        BriefwerkError::Database(_) => HumanError {
            message: "The letter archive had a problem.".into(),
            suggestion: "Try again. Your letters are not lost.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BriefwerkError::Io(io_err) => HumanError {
            message: "There was a problem reading or writing a file.".into(),
            suggestion: format!("Try again. If this keeps happening, check disk space. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        BriefwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timestamp_requires_action() {
        let human = humanize_error(&BriefwerkError::MissingReferenceTimestamp);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn lookup_failure_is_transient() {
        let human = humanize_error(&BriefwerkError::Lookup("connection refused".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn unapproved_letter_names_the_number() {
        let human = humanize_error(&BriefwerkError::LetterNotApproved {
            number: "004/PERM/05/2026".into(),
        });
        assert!(human.message.contains("004/PERM/05/2026"));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn qr_failure_is_retriable() {
        let human = humanize_error(&BriefwerkError::QrEncoding("data too long".into()));
        assert!(human.retriable);
    }
}
