//! Append-only execution history
//!
//! Every execution attempt, synthesized or free-form, lands here exactly
//! once before control returns to the caller. Entries are immutable and
//! strictly append-ordered; the only deletion path is the bulk clear a
//! store reset performs.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Store;

/// One recorded execution attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The statement text as executed (display form for synthesized SQL).
    pub text: String,
    pub executed_at: DateTime<Utc>,
    pub succeeded: bool,
    /// Native store error message, verbatim, for failed attempts.
    pub error: Option<String>,
}

/// Appends one entry. Durable before this returns.
pub fn append(store: &Store, text: &str, succeeded: bool, error: Option<&str>) -> Result<()> {
    store.conn().execute(
        "INSERT INTO query_history (query_text, executed_at, success, error_message)
         VALUES (?1, ?2, ?3, ?4)",
        params![text, Utc::now().to_rfc3339(), succeeded, error],
    )?;
    Ok(())
}

/// Returns up to `limit` entries, most recent first. Read-only.
pub fn recent(store: &Store, limit: usize) -> Result<Vec<HistoryEntry>> {
    let mut stmt = store.conn().prepare(
        "SELECT query_text, executed_at, success, error_message
         FROM query_history ORDER BY id DESC LIMIT ?1",
    )?;
    let entries = stmt
        .query_map(params![limit as i64], |row| {
            let stamp: String = row.get(1)?;
            let executed_at = DateTime::parse_from_rfc3339(&stamp)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(HistoryEntry {
                text: row.get(0)?,
                executed_at,
                succeeded: row.get(2)?,
                error: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Bulk-clears the log. Only called from a store reset.
pub fn clear(store: &Store) -> Result<()> {
    store.conn().execute("DELETE FROM query_history", [])?;
    Ok(())
}
