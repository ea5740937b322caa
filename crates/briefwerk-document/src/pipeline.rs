// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Approved letter → PDF bytes.
//
// Derives the validation code, builds the verification URL and scannable
// code, composes the HTML, and hands it to the pooled renderer. Only
// approved letters get this far; a QR failure degrades to a text-only
// validation code rather than blocking the document.

use briefwerk_core::config::{SchoolIdentity, ValidationSecret};
use briefwerk_core::error::{BriefwerkError, Result};
use briefwerk_core::types::PermissionLetter;
use chrono::Utc;
use tracing::{debug, instrument, warn};

use briefwerk_verify::{TimestampSource, select_reference_timestamp};
use briefwerk_verify::{derive_code, verification_url};

use crate::qr::scannable_code_svg;
use crate::render::RendererPool;
use crate::template::compose_letter_html;

/// Render an approved letter to PDF bytes.
#[instrument(skip_all, fields(number = %letter.letter_number))]
pub fn render_permission_letter(
    letter: &PermissionLetter,
    school: &SchoolIdentity,
    verification_base_url: &str,
    secret: &ValidationSecret,
    renderer: &RendererPool,
) -> Result<Vec<u8>> {
    if !letter.is_approved() {
        return Err(BriefwerkError::LetterNotApproved {
            number: letter.letter_number.to_string(),
        });
    }

    let reference = select_reference_timestamp(&TimestampSource::from(letter))?;
    let code = derive_code(&letter.id, reference.instant(), secret);
    let url = verification_url(verification_base_url, &letter.letter_number, &code);

    let qr_svg = match scannable_code_svg(&url) {
        Ok(svg) => Some(svg),
        Err(e) => {
            warn!(error = %e, "scannable code generation failed — printing text code only");
            None
        }
    };

    let html = compose_letter_html(school, letter, &code, qr_svg.as_deref(), Utc::now());
    debug!(html_len = html.len(), "letter HTML composed");

    renderer.render(&html)
}
