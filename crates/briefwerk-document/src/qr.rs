// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scannable code generation — the verification URL as an SVG QR image.

use briefwerk_core::error::{BriefwerkError, Result};
use qrcode::{QrCode, render::svg};

/// Render `data` (normally a verification URL) as an SVG QR code.
///
/// The image is black-on-white and at least 200×200 so it survives both
/// screen display and a 90px print placement.
pub fn scannable_code_svg(data: &str) -> Result<String> {
    let code = QrCode::new(data).map_err(|e| BriefwerkError::QrEncoding(e.to_string()))?;

    Ok(code
        .render()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
