// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation-code derivation — HMAC-SHA-256 over the letter identity and
// its reference timestamp, truncated to a printable 16-character code.

use briefwerk_core::config::ValidationSecret;
use briefwerk_core::types::LetterId;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a validation code in characters.
pub const CODE_LENGTH: usize = 16;

/// Derive the validation code for a letter.
///
/// The canonical message is `"<letterId>-<timestamp>"` with the timestamp
/// rendered in RFC 3339 at millisecond precision with a `Z` suffix — the
/// exact text form already printed documents were derived from, so the
/// formatting must never change. The HMAC-SHA-256 digest is hex-encoded,
/// truncated to the first 16 characters, and uppercased.
///
/// Pure: identical inputs always yield the identical code; any change to
/// the identity or to the timestamp (down to the millisecond) changes the
/// output with overwhelming probability.
pub fn derive_code(
    letter_id: &LetterId,
    reference: DateTime<Utc>,
    secret: &ValidationSecret,
) -> String {
    let message = format!(
        "{}-{}",
        letter_id,
        reference.to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(message.as_bytes());

    let digest = hex::encode(mac.finalize().into_bytes());
    digest[..CODE_LENGTH].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn secret() -> ValidationSecret {
        ValidationSecret::from_value("test-secret")
    }

    fn instant(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000).unwrap()
    }

    #[test]
    fn code_is_sixteen_uppercase_hex_chars() {
        let code = derive_code(&LetterId("L1".into()), instant(1_709_287_200, 0), &secret());
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn derivation_is_deterministic() {
        let id = LetterId("letter-7".into());
        let ts = instant(1_700_000_000, 250);
        assert_eq!(
            derive_code(&id, ts, &secret()),
            derive_code(&id, ts, &secret())
        );
    }

    #[test]
    fn one_second_change_alters_the_code() {
        let id = LetterId("letter-7".into());
        assert_ne!(
            derive_code(&id, instant(1_700_000_000, 0), &secret()),
            derive_code(&id, instant(1_700_000_001, 0), &secret())
        );
    }

    #[test]
    fn one_millisecond_change_alters_the_code() {
        let id = LetterId("letter-7".into());
        assert_ne!(
            derive_code(&id, instant(1_700_000_000, 0), &secret()),
            derive_code(&id, instant(1_700_000_000, 1), &secret())
        );
    }

    #[test]
    fn identity_change_alters_the_code() {
        let ts = instant(1_700_000_000, 0);
        assert_ne!(
            derive_code(&LetterId("a".into()), ts, &secret()),
            derive_code(&LetterId("b".into()), ts, &secret())
        );
    }

    #[test]
    fn secret_change_alters_the_code() {
        let id = LetterId("letter-7".into());
        let ts = instant(1_700_000_000, 0);
        assert_ne!(
            derive_code(&id, ts, &ValidationSecret::from_value("alpha")),
            derive_code(&id, ts, &ValidationSecret::from_value("beta"))
        );
    }

    /// Property check over many random-ish timestamp pairs: distinct
    /// instants never collide in practice.
    #[test]
    fn distinct_timestamps_never_collide_in_practice() {
        let id = LetterId("sensitivity".into());
        let s = secret();
        let mut base = 1_600_000_000_i64;
        for step in 1..200_i64 {
            let a = instant(base, 0);
            let b = instant(base + step, 0);
            assert_ne!(derive_code(&id, a, &s), derive_code(&id, b, &s));
            base += step * 37;
        }
    }
}
