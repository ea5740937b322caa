// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reference timestamp selection.
//
// Exactly one instant governs a letter's validation code: the approval
// instant when the letter has one, otherwise the creation instant. A letter
// with neither is rejected outright — deriving from the current wall clock
// would mint a code that can never match on a later verification call.

use briefwerk_core::PermissionLetter;
use briefwerk_core::error::{BriefwerkError, Result};
use chrono::{DateTime, Utc};

/// The timestamp fields of a letter that are candidates for code derivation.
///
/// A small typed record rather than the full letter, so the policy stays a
/// pure function and other storage backends can feed it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampSource {
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&PermissionLetter> for TimestampSource {
    fn from(letter: &PermissionLetter) -> Self {
        Self {
            approved_at: letter.approved_at,
            created_at: letter.created_at,
        }
    }
}

/// The instant selected as authoritative, tagged with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTimestamp {
    Approved(DateTime<Utc>),
    Created(DateTime<Utc>),
}

impl ReferenceTimestamp {
    /// The underlying instant, regardless of provenance.
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::Approved(t) | Self::Created(t) => *t,
        }
    }
}

/// Select the one timestamp that governs validation-code derivation.
///
/// Approval instant wins; the creation instant is the fallback. Both absent
/// is an invariant violation in the letter record and yields
/// [`BriefwerkError::MissingReferenceTimestamp`].
pub fn select_reference_timestamp(source: &TimestampSource) -> Result<ReferenceTimestamp> {
    if let Some(approved) = source.approved_at {
        return Ok(ReferenceTimestamp::Approved(approved));
    }
    if let Some(created) = source.created_at {
        return Ok(ReferenceTimestamp::Created(created));
    }
    Err(BriefwerkError::MissingReferenceTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn approval_instant_wins() {
        let source = TimestampSource {
            approved_at: Some(instant(2_000)),
            created_at: Some(instant(1_000)),
        };
        let selected = select_reference_timestamp(&source).unwrap();
        assert_eq!(selected, ReferenceTimestamp::Approved(instant(2_000)));
        assert_eq!(selected.instant(), instant(2_000));
    }

    #[test]
    fn creation_instant_is_the_fallback() {
        let source = TimestampSource {
            approved_at: None,
            created_at: Some(instant(1_000)),
        };
        assert_eq!(
            select_reference_timestamp(&source).unwrap(),
            ReferenceTimestamp::Created(instant(1_000))
        );
    }

    #[test]
    fn no_timestamp_is_rejected() {
        let source = TimestampSource {
            approved_at: None,
            created_at: None,
        };
        let err = select_reference_timestamp(&source).unwrap_err();
        assert!(matches!(err, BriefwerkError::MissingReferenceTimestamp));
    }

    #[test]
    fn selection_is_deterministic() {
        let source = TimestampSource {
            approved_at: Some(instant(42)),
            created_at: None,
        };
        assert_eq!(
            select_reference_timestamp(&source).unwrap(),
            select_reference_timestamp(&source).unwrap()
        );
    }
}
