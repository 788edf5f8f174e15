//! Lesson completion log
//!
//! Tracks which lessons the learner has marked complete, in the reserved
//! `lesson_progress` table. Independent of the query history: resetting
//! progress leaves the database content untouched.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::store::Store;

/// Marks a lesson complete, stamping the completion time. Idempotent.
pub fn mark_complete(store: &Store, lesson_id: &str) -> Result<()> {
    store.conn().execute(
        "INSERT OR REPLACE INTO lesson_progress (lesson_id, completed, completed_at)
         VALUES (?1, 1, ?2)",
        params![lesson_id, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Whether a lesson has been marked complete.
pub fn is_complete(store: &Store, lesson_id: &str) -> Result<bool> {
    let completed: Option<i64> = store
        .conn()
        .query_row(
            "SELECT completed FROM lesson_progress WHERE lesson_id = ?1",
            params![lesson_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(completed == Some(1))
}

/// Clears all lesson progress without touching database content.
pub fn reset(store: &Store) -> Result<()> {
    store.conn().execute("DELETE FROM lesson_progress", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_check() {
        let store = Store::in_memory().unwrap();
        assert!(!is_complete(&store, "SELECT_1").unwrap());

        mark_complete(&store, "SELECT_1").unwrap();
        assert!(is_complete(&store, "SELECT_1").unwrap());
        // Marking again is fine
        mark_complete(&store, "SELECT_1").unwrap();
        assert!(is_complete(&store, "SELECT_1").unwrap());

        assert!(!is_complete(&store, "JOIN_1").unwrap());
    }

    #[test]
    fn test_reset_clears_progress_only() {
        let store = Store::in_memory().unwrap();
        mark_complete(&store, "SELECT_1").unwrap();
        reset(&store).unwrap();
        assert!(!is_complete(&store, "SELECT_1").unwrap());
        // Seed data untouched
        assert!(store.table_names().unwrap().contains(&"students".to_string()));
    }
}
