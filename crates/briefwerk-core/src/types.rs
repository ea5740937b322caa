// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Briefwerk letter engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque stable identifier of a letter record.
///
/// Used only as derivation input for validation codes and as a storage key —
/// never parsed, never shown on the printed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterId(pub String);

impl LetterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LetterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LetterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable formatted letter number, e.g. `012/PERM/03/2026`.
///
/// This is the public lookup key printed on the document and embedded in the
/// verification payload. It contains `/` separators, so it must be
/// percent-encoded before being placed in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterNumber(pub String);

impl LetterNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LetterNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for LetterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a permission letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    /// Created, waiting for an administrator's decision.
    Pending,
    /// Approved — the letter can be rendered and verified.
    Approved,
    /// Rejected — the letter is kept for the record but never verifiable.
    Rejected,
}

impl LetterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Kinds of permission letter the school issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterType {
    /// Excuses students from lessons for an external obligation.
    Dispensation,
    /// Certifies a fact about the named students.
    Certificate,
    /// Assigns students or staff to an activity on the school's behalf.
    Assignment,
    /// Permits participation in a competition.
    Competition,
}

impl LetterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispensation => "dispensation",
            Self::Certificate => "certificate",
            Self::Assignment => "assignment",
            Self::Competition => "competition",
        }
    }

    /// Uppercase heading used in the rendered document title.
    pub fn document_title(&self) -> &'static str {
        match self {
            Self::Dispensation => "DISPENSATION",
            Self::Certificate => "CERTIFICATE",
            Self::Assignment => "ASSIGNMENT",
            Self::Competition => "COMPETITION PERMIT",
        }
    }
}

/// A student (or staff member) named on a permission letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// Class or role, e.g. "11-B" or "Homeroom teacher".
    pub class_group: String,
    /// Optional per-participant note shown in the letter table.
    pub note: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, class_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_group: class_group.into(),
            note: None,
        }
    }
}

/// Input fields for creating a new letter.
///
/// The engine assigns the identity, letter number, status, and timestamps;
/// everything the requester controls lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterDraft {
    pub letter_type: LetterType,
    pub activity: String,
    pub location: String,
    /// Date of the activity itself (not of the letter).
    pub date: DateTime<Utc>,
    pub time_start: String,
    pub time_end: String,
    pub reason: Option<String>,
    pub participants: Vec<Participant>,
    /// Name of the person who created the letter.
    pub created_by: String,
}

/// A complete permission letter record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionLetter {
    pub id: LetterId,
    pub letter_number: LetterNumber,
    pub status: LetterStatus,
    pub letter_type: LetterType,
    pub activity: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub time_start: String,
    pub time_end: String,
    pub reason: Option<String>,
    pub participants: Vec<Participant>,
    pub created_by: String,
    /// Name of the administrator who decided on the letter, once decided.
    pub approved_by: Option<String>,
    /// Instant of the approval (or rejection) decision.
    pub approved_at: Option<DateTime<Utc>>,
    /// Present on every record the engine creates itself; optional because
    /// records imported from legacy storage may carry a damaged or missing
    /// creation time, in which case an unapproved letter has no reference
    /// timestamp and cannot be verified.
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PermissionLetter {
    /// Create a pending letter from a draft with a freshly assigned number.
    pub fn new(letter_number: LetterNumber, draft: LetterDraft) -> Self {
        let now = Utc::now();
        Self {
            id: LetterId::new(),
            letter_number,
            status: LetterStatus::Pending,
            letter_type: draft.letter_type,
            activity: draft.activity,
            location: draft.location,
            date: draft.date,
            time_start: draft.time_start,
            time_end: draft.time_end,
            reason: draft.reason,
            participants: draft.participants,
            created_by: draft.created_by,
            approved_by: None,
            approved_at: None,
            created_at: Some(now),
            updated_at: now,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_approved(&self) -> bool {
        self.status == LetterStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LetterDraft {
        LetterDraft {
            letter_type: LetterType::Dispensation,
            activity: "Regional robotics final".into(),
            location: "City convention hall".into(),
            date: Utc::now(),
            time_start: "08:00".into(),
            time_end: "15:00".into(),
            reason: None,
            participants: vec![Participant::new("A. Student", "11-B")],
            created_by: "Office clerk".into(),
        }
    }

    #[test]
    fn new_letter_is_pending_without_approval_fields() {
        let letter = PermissionLetter::new(LetterNumber::from("001/PERM/03/2026"), draft());
        assert_eq!(letter.status, LetterStatus::Pending);
        assert!(letter.approved_by.is_none());
        assert!(letter.approved_at.is_none());
        assert!(letter.created_at.is_some());
        assert_eq!(letter.participant_count(), 1);
        assert!(!letter.is_approved());
    }

    #[test]
    fn letter_ids_are_unique() {
        assert_ne!(LetterId::new(), LetterId::new());
    }

    #[test]
    fn status_wire_form_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&LetterStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(LetterStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn letter_type_wire_form_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&LetterType::Competition).unwrap(),
            "\"competition\""
        );
        assert_eq!(LetterType::Dispensation.document_title(), "DISPENSATION");
    }
}
