// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration and validation-secret handling.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable holding the shared validation secret.
pub const SECRET_ENV_VAR: &str = "BRIEFWERK_HMAC_SECRET";

/// Fixed fallback used when no secret is configured.
///
/// Documents already in circulation were issued against this literal, so it
/// must stay byte-identical on both the issuing and the checking side.
/// Running on the fallback is loudly warned about at load time — a
/// publicly guessable key undermines the whole scheme.
const FALLBACK_SECRET: &str = "default-secret-key";

/// Letterhead identity printed at the top of every rendered letter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolIdentity {
    /// Operating foundation or district, shown above the school name.
    pub authority: String,
    pub school_name: String,
    pub address: String,
    /// City printed next to the signature date.
    pub city: String,
    pub email: String,
    pub website: String,
}

impl Default for SchoolIdentity {
    fn default() -> Self {
        Self {
            authority: "Birrul Walidain Education Foundation".into(),
            school_name: "PESAT Vocational High School".into(),
            address: "7 Poras Road, Bogor".into(),
            city: "Bogor".into(),
            email: "office@school.example".into(),
            website: "www.school.example".into(),
        }
    }
}

/// Persistent application settings.
///
/// The validation secret is deliberately NOT part of this struct: it comes
/// from the environment via [`ValidationSecret`] and must never be written
/// to disk or serialized into a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub school: SchoolIdentity,
    /// Base URL the verification link and QR payload point at,
    /// e.g. `https://letters.school.example`.
    pub verification_base_url: String,
    /// Seconds of inactivity after which the pooled renderer is torn down.
    pub renderer_idle_timeout_secs: u64,
    /// Enable the verification audit trail.
    pub audit_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            school: SchoolIdentity::default(),
            verification_base_url: "https://letters.school.example".into(),
            renderer_idle_timeout_secs: 300,
            audit_enabled: true,
        }
    }
}

/// The shared secret keying every validation code.
///
/// This is the sole trust anchor of the verification scheme. The wrapper
/// keeps the value out of `Debug` output and log lines; only
/// [`ValidationSecret::expose`] hands the raw bytes to the code deriver.
#[derive(Clone)]
pub struct ValidationSecret(String);

impl ValidationSecret {
    /// Load the secret from the environment.
    ///
    /// An unset or empty variable falls back to the fixed documented
    /// default so that previously issued documents stay verifiable, and a
    /// warning is emitted so operators notice the misconfiguration.
    pub fn from_env() -> Self {
        match std::env::var(SECRET_ENV_VAR) {
            Ok(value) if !value.is_empty() => Self(value),
            _ => {
                warn!(
                    var = SECRET_ENV_VAR,
                    "validation secret not configured — using the built-in \
                     fallback; codes derived with it are publicly forgeable"
                );
                Self(FALLBACK_SECRET.into())
            }
        }
    }

    /// Build a secret from an explicit value (tests, embedders with their
    /// own configuration source). Empty values resolve to the fallback,
    /// matching [`ValidationSecret::from_env`].
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            warn!("empty validation secret — using the built-in fallback");
            Self(FALLBACK_SECRET.into())
        } else {
            Self(value)
        }
    }

    /// Whether the secret in use is the built-in fallback.
    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_SECRET
    }

    /// The raw secret bytes, for keying the HMAC. Do not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ValidationSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidationSecret(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_resolves_to_fallback() {
        let secret = ValidationSecret::from_value("");
        assert!(secret.is_fallback());
        assert_eq!(secret.expose(), FALLBACK_SECRET);
    }

    #[test]
    fn explicit_value_is_kept() {
        let secret = ValidationSecret::from_value("letters-2026");
        assert!(!secret.is_fallback());
        assert_eq!(secret.expose(), "letters-2026");
    }

    #[test]
    fn debug_output_redacts_the_value() {
        let secret = ValidationSecret::from_value("super-secret");
        let printed = format!("{secret:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn default_config_is_sane() {
        let config = AppConfig::default();
        assert!(config.verification_base_url.starts_with("https://"));
        assert!(config.audit_enabled);
        assert!(config.renderer_idle_timeout_secs > 0);
    }
}
