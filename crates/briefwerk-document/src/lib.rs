// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// briefwerk-document — turning an approved letter into a printable document.
//
// The letter body is composed as fixed-layout HTML; the scannable
// verification code is rendered as inline SVG; the actual HTML→PDF
// conversion is a black-box capability behind the `HtmlRenderer` trait,
// managed by a single-instance pool with idle-timeout cleanup.

pub mod pipeline;
pub mod qr;
pub mod render;
pub mod template;

pub use pipeline::render_permission_letter;
pub use qr::scannable_code_svg;
pub use render::{HtmlRenderer, RendererPool};
pub use template::compose_letter_html;
