// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Letter number generation.
//
// Numbers have the shape `NNN/PERM/MM/YYYY`: a zero-padded sequence that
// resets every month, a fixed tag, and the issue month and year. The next
// sequence is read off the latest number issued in the current month.

use briefwerk_core::types::LetterNumber;
use chrono::{DateTime, Datelike, Utc};

/// Fixed tag segment embedded in every permission-letter number.
pub const NUMBER_TAG: &str = "PERM";

/// Format a letter number from its components.
///
/// The sequence is padded to at least three digits; it grows naturally
/// past 999.
pub fn format_letter_number(sequence: u32, month: u32, year: i32) -> LetterNumber {
    LetterNumber(format!("{sequence:03}/{NUMBER_TAG}/{month:02}/{year}"))
}

/// Extract the leading sequence from an existing number.
///
/// Tolerant of hand-edited records: the first run of digits counts,
/// anything unparseable yields `None`.
fn leading_sequence(number: &LetterNumber) -> Option<u32> {
    let digits: String = number
        .as_str()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Compute the next number to issue.
///
/// `last_in_month` is the most recent number issued in the month of `now`;
/// `None` (or an unparseable number) starts the month at 001.
pub fn next_letter_number(last_in_month: Option<&LetterNumber>, now: DateTime<Utc>) -> LetterNumber {
    let next_sequence = last_in_month
        .and_then(leading_sequence)
        .map(|seq| seq + 1)
        .unwrap_or(1);

    format_letter_number(next_sequence, now.month(), now.year())
}
