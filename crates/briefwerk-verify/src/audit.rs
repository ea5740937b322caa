// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification audit trail — append-only SQLite log of verification attempts.
//
// Schema:
//   verification_log(
//     id            INTEGER PRIMARY KEY AUTOINCREMENT,
//     timestamp     TEXT    NOT NULL,   -- RFC 3339
//     letter_number TEXT    NOT NULL,   -- as submitted (trimmed)
//     outcome       TEXT    NOT NULL,   -- "valid" or a rejection reason
//     success       INTEGER NOT NULL,   -- 0 = rejected, 1 = valid
//     details       TEXT                -- optional context, never a code
//   )
//
// Submitted and derived validation codes are never written here — only
// infrastructure failures carry free-form detail.

use std::path::Path;

use briefwerk_core::error::BriefwerkError;
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Convert a `rusqlite::Error` into a `BriefwerkError::Database`.
fn db_err(e: rusqlite::Error) -> BriefwerkError {
    BriefwerkError::Database(e.to_string())
}

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS verification_log (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp     TEXT    NOT NULL,
    letter_number TEXT    NOT NULL,
    outcome       TEXT    NOT NULL,
    success       INTEGER NOT NULL,
    details       TEXT
);";

/// A single entry in the verification log, used for queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationEntry {
    pub id: i64,
    pub timestamp: String,
    pub letter_number: String,
    pub outcome: String,
    pub success: bool,
    pub details: Option<String>,
}

/// Append-only verification log backed by a SQLite database.
pub struct VerificationLog {
    conn: Connection,
}

impl VerificationLog {
    /// Open (or create) the verification log database at `path`.
    ///
    /// The table is created automatically if it does not already exist.
    /// WAL mode is enabled for better concurrent-read performance.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BriefwerkError> {
        let conn = Connection::open(path).map_err(db_err)?;

        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("verification log opened");
        Ok(Self { conn })
    }

    /// Open an in-memory verification log (useful for tests).
    pub fn open_in_memory() -> Result<Self, BriefwerkError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory verification log opened");
        Ok(Self { conn })
    }

    /// Record a verification attempt.
    ///
    /// `outcome` is `"valid"` or a rejection reason keyword. `details` must
    /// never contain the submitted or expected code.
    #[instrument(skip(self, details), fields(%letter_number, %outcome, success))]
    pub fn record(
        &self,
        letter_number: &str,
        outcome: &str,
        success: bool,
        details: Option<&str>,
    ) -> Result<(), BriefwerkError> {
        let timestamp = Utc::now().to_rfc3339();
        let success_int: i32 = if success { 1 } else { 0 };

        self.conn
            .execute(
                "INSERT INTO verification_log (timestamp, letter_number, outcome, success, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![timestamp, letter_number, outcome, success_int, details],
            )
            .map_err(db_err)?;

        debug!("verification attempt recorded");
        Ok(())
    }

    /// Retrieve all entries for a given letter number, oldest first.
    pub fn entries_for_number(
        &self,
        letter_number: &str,
    ) -> Result<Vec<VerificationEntry>, BriefwerkError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, letter_number, outcome, success, details
                 FROM verification_log
                 WHERE letter_number = ?1
                 ORDER BY timestamp ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![letter_number], row_to_entry)
            .map_err(db_err)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(db_err)?);
        }
        Ok(entries)
    }

    /// Retrieve the most recent `limit` entries, newest first.
    pub fn recent_entries(&self, limit: u32) -> Result<Vec<VerificationEntry>, BriefwerkError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, letter_number, outcome, success, details
                 FROM verification_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![limit], row_to_entry)
            .map_err(db_err)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(db_err)?);
        }
        Ok(entries)
    }

    /// Total number of recorded attempts.
    pub fn count(&self) -> Result<u64, BriefwerkError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM verification_log", [], |row| row.get(0))
            .map_err(db_err)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<VerificationEntry> {
    Ok(VerificationEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        letter_number: row.get(2)?,
        outcome: row.get(3)?,
        success: row.get::<_, i32>(4)? != 0,
        details: row.get(5)?,
    })
}
