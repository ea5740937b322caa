// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Briefwerk.

use thiserror::Error;

/// Top-level error type for all Briefwerk operations.
#[derive(Debug, Error)]
pub enum BriefwerkError {
    // -- Verification errors --
    #[error("letter has neither an approval nor a creation timestamp")]
    MissingReferenceTimestamp,

    #[error("letter lookup failed: {0}")]
    Lookup(String),

    // -- Letter errors --
    #[error("letter {number} is not approved")]
    LetterNotApproved { number: String },

    #[error("letter not found: {0}")]
    LetterNotFound(String),

    #[error("invalid letter data: {0}")]
    InvalidLetter(String),

    // -- Document errors --
    #[error("document rendering failed: {0}")]
    Render(String),

    #[error("no renderer available: {0}")]
    RendererUnavailable(String),

    #[error("scannable code generation failed: {0}")]
    QrEncoding(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BriefwerkError>;
