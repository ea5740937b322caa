// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Approval lifecycle transitions.
//
// Approving or rejecting a letter stamps the decision instant and the
// deciding administrator; reverting to pending clears both. The approval
// instant doubles as the reference timestamp for code derivation, so it
// is stamped exactly once per decision and passed in explicitly.

use briefwerk_core::types::{LetterStatus, PermissionLetter};
use chrono::{DateTime, Utc};

/// Mark a letter approved.
pub fn approve(letter: &mut PermissionLetter, approver: impl Into<String>, at: DateTime<Utc>) {
    letter.status = LetterStatus::Approved;
    letter.approved_by = Some(approver.into());
    letter.approved_at = Some(at);
    letter.updated_at = at;
}

/// Mark a letter rejected. The decision is still stamped — the record
/// keeps who rejected it and when.
pub fn reject(letter: &mut PermissionLetter, approver: impl Into<String>, at: DateTime<Utc>) {
    letter.status = LetterStatus::Rejected;
    letter.approved_by = Some(approver.into());
    letter.approved_at = Some(at);
    letter.updated_at = at;
}

/// Send a decided letter back to pending, clearing the decision fields.
///
/// Clearing `approved_at` matters: a later re-approval gets a fresh
/// instant, and every code derived from the old one stops verifying.
pub fn revert_to_pending(letter: &mut PermissionLetter, at: DateTime<Utc>) {
    letter.status = LetterStatus::Pending;
    letter.approved_by = None;
    letter.approved_at = None;
    letter.updated_at = at;
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefwerk_core::types::{LetterDraft, LetterNumber, LetterType, Participant};
    use chrono::TimeZone;

    fn letter() -> PermissionLetter {
        PermissionLetter::new(
            LetterNumber::from("002/PERM/06/2026"),
            LetterDraft {
                letter_type: LetterType::Certificate,
                activity: "Community service".into(),
                location: "City park".into(),
                date: Utc.with_ymd_and_hms(2026, 6, 20, 0, 0, 0).unwrap(),
                time_start: "08:00".into(),
                time_end: "11:00".into(),
                reason: None,
                participants: vec![Participant::new("Dewi Lestari", "12-B")],
                created_by: "Clerk".into(),
            },
        )
    }

    fn decision_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn approve_stamps_decision_fields() {
        let mut l = letter();
        approve(&mut l, "Principal", decision_instant());

        assert_eq!(l.status, LetterStatus::Approved);
        assert_eq!(l.approved_by.as_deref(), Some("Principal"));
        assert_eq!(l.approved_at, Some(decision_instant()));
        assert_eq!(l.updated_at, decision_instant());
    }

    #[test]
    fn reject_also_stamps_decision_fields() {
        let mut l = letter();
        reject(&mut l, "Vice principal", decision_instant());

        assert_eq!(l.status, LetterStatus::Rejected);
        assert_eq!(l.approved_by.as_deref(), Some("Vice principal"));
        assert!(l.approved_at.is_some());
    }

    #[test]
    fn revert_clears_decision_fields() {
        let mut l = letter();
        approve(&mut l, "Principal", decision_instant());

        let later = Utc.with_ymd_and_hms(2026, 6, 16, 9, 0, 0).unwrap();
        revert_to_pending(&mut l, later);

        assert_eq!(l.status, LetterStatus::Pending);
        assert!(l.approved_by.is_none());
        assert!(l.approved_at.is_none());
        assert_eq!(l.updated_at, later);
    }

    #[test]
    fn reapproval_gets_a_fresh_instant() {
        let mut l = letter();
        approve(&mut l, "Principal", decision_instant());
        let first = l.approved_at;

        revert_to_pending(&mut l, decision_instant());
        let second_instant = Utc.with_ymd_and_hms(2026, 6, 17, 8, 0, 0).unwrap();
        approve(&mut l, "Principal", second_instant);

        assert_ne!(l.approved_at, first);
        assert_eq!(l.approved_at, Some(second_instant));
    }
}
