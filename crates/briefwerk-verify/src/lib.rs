// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// briefwerk-verify — the document validation subsystem.
//
// An approved letter gets a 16-character validation code derived from its
// identity and reference timestamp under a shared secret. The code is
// printed on the document and embedded (with the letter number) in a
// scannable verification URL. Anyone holding the document can later submit
// the (number, code) pair; this crate recomputes the expected code and
// returns a verdict plus a read-only disclosure of the letter.

pub mod audit;
pub mod derive;
pub mod payload;
pub mod protocol;
pub mod timestamp;

pub use audit::{VerificationEntry, VerificationLog};
pub use derive::{CODE_LENGTH, derive_code};
pub use payload::{DecodedPayload, decode_payload, encode_payload, verification_url};
pub use protocol::{
    DocumentVerifier, LetterDirectory, LetterDisclosure, RejectionReason, VerificationReport,
};
pub use timestamp::{ReferenceTimestamp, TimestampSource, select_reference_timestamp};
