// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedded verification payloads.
//
// The payload `<urlEncodedLetterNumber>-<code>` is the tail of the
// verification URL and the content of the scannable code on the printed
// document. Letter numbers contain `/` (and may contain `-`), so encoding
// keeps the number inside one URL path segment and decoding always splits
// on the LAST hyphen.

use briefwerk_core::types::LetterNumber;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except unreserved characters is percent-encoded, matching the
/// encoding already-issued documents carry. `-` stays literal; the
/// last-hyphen rule on decode makes that safe.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A decoded verification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub letter_number: String,
    pub code: String,
}

/// Build the payload embedded in verification URLs and scannable codes.
pub fn encode_payload(letter_number: &LetterNumber, code: &str) -> String {
    format!(
        "{}-{}",
        utf8_percent_encode(letter_number.as_str(), PATH_SEGMENT),
        code
    )
}

/// Split a payload back into letter number and code.
///
/// The code is everything after the last hyphen; the prefix is
/// percent-decoded, falling back to the raw text when decoding fails. A
/// payload without a usable hyphen yields an empty letter number and the
/// whole string as the code — a defined degraded result, never an error.
pub fn decode_payload(payload: &str) -> DecodedPayload {
    let (encoded_number, code) = match payload.rfind('-') {
        Some(idx) if idx > 0 => (&payload[..idx], &payload[idx + 1..]),
        _ => ("", payload),
    };

    let letter_number = percent_decode_str(encoded_number)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| encoded_number.to_string());

    DecodedPayload {
        letter_number,
        code: code.to_string(),
    }
}

/// Full verification URL: `<base>/verify/<payload>`.
pub fn verification_url(base: &str, letter_number: &LetterNumber, code: &str) -> String {
    format!(
        "{}/verify/{}",
        base.trim_end_matches('/'),
        encode_payload(letter_number, code)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_in_letter_number_round_trips() {
        let number = LetterNumber::from("012/PERM/03/2026");
        let payload = encode_payload(&number, "ABCDEF0123456789");

        assert!(!payload[..payload.len() - 17].contains('/'), "raw slash would split the URL path");

        let decoded = decode_payload(&payload);
        assert_eq!(decoded.letter_number, "012/PERM/03/2026");
        assert_eq!(decoded.code, "ABCDEF0123456789");
    }

    #[test]
    fn decode_splits_on_the_last_hyphen() {
        let decoded = decode_payload("A/B-C-1234567890ABCDEF");
        assert_eq!(decoded.letter_number, "A/B-C");
        assert_eq!(decoded.code, "1234567890ABCDEF");
    }

    #[test]
    fn hyphen_in_letter_number_round_trips() {
        let number = LetterNumber::from("EX-7/PERM/01/2026");
        let decoded = decode_payload(&encode_payload(&number, "0000111122223333"));
        assert_eq!(decoded.letter_number, "EX-7/PERM/01/2026");
        assert_eq!(decoded.code, "0000111122223333");
    }

    #[test]
    fn payload_without_hyphen_degrades_to_code_only() {
        let decoded = decode_payload("ABCDEF0123456789");
        assert_eq!(decoded.letter_number, "");
        assert_eq!(decoded.code, "ABCDEF0123456789");
    }

    #[test]
    fn leading_hyphen_payload_degrades_to_code_only() {
        let decoded = decode_payload("-ABCDEF0123456789");
        assert_eq!(decoded.letter_number, "");
        assert_eq!(decoded.code, "-ABCDEF0123456789");
    }

    #[test]
    fn invalid_percent_sequences_fall_back_to_raw_text() {
        // `%E0%80` is not valid UTF-8 once decoded; the raw prefix survives.
        let decoded = decode_payload("%E0%80-ABCDEF0123456789");
        assert_eq!(decoded.letter_number, "%E0%80");
        assert_eq!(decoded.code, "ABCDEF0123456789");
    }

    #[test]
    fn verification_url_shape() {
        let number = LetterNumber::from("005/PERM/11/2026");
        let url = verification_url("https://letters.example", &number, "AAAA0000BBBB1111");
        assert_eq!(
            url,
            "https://letters.example/verify/005%2FPERM%2F11%2F2026-AAAA0000BBBB1111"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let number = LetterNumber::from("1/PERM/1/2026");
        let url = verification_url("https://letters.example/", &number, "AAAA0000BBBB1111");
        assert!(!url.contains("//verify"));
    }
}
