//! Workbench session facade
//!
//! The surface the UI collaborator talks to: owns the store handle and
//! exposes free-form execution, history, table listing, reset, and lesson
//! progress. Grid operations take the store from here via `store()`.

use std::path::Path;

use crate::error::Result;
use crate::execution::{self, ExecutionOutcome};
use crate::grid::Grid;
use crate::history::{self, HistoryEntry};
use crate::progress;
use crate::store::Store;

/// A learning-workbench session over one store.
pub struct Session {
    store: Store,
}

impl Session {
    /// Opens a session over a store at `path`, creating it if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Session {
            store: Store::open(path)?,
        })
    }

    /// Opens a session over a fresh in-memory store.
    pub fn in_memory() -> Result<Self> {
        Ok(Session {
            store: Store::in_memory()?,
        })
    }

    /// The owned store handle, for grid operations.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Executes one free-form statement (console input or a lesson's
    /// example). Every attempt is recorded in history.
    pub fn execute_freeform(&self, sql: &str) -> ExecutionOutcome {
        execution::execute_freeform(&self.store, sql)
    }

    /// Recent execution history, most recent first.
    pub fn query_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        history::recent(&self.store, limit)
    }

    /// User tables, excluding the reserved bookkeeping tables.
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.store.table_names()
    }

    /// Resets the store: drops user tables, clears both logs, reseeds.
    /// Grids bound before a reset must be rebound before further edits.
    pub fn reset_database(&self) -> Result<()> {
        self.store.reset()
    }

    /// A grid bound to `table`, loaded with its current rows.
    pub fn grid(&self, table: &str) -> Result<Grid> {
        let mut grid = Grid::new();
        grid.bind(&self.store, table)?;
        Ok(grid)
    }

    pub fn mark_lesson_complete(&self, lesson_id: &str) -> Result<()> {
        progress::mark_complete(&self.store, lesson_id)
    }

    pub fn lesson_completed(&self, lesson_id: &str) -> Result<bool> {
        progress::is_complete(&self.store, lesson_id)
    }

    pub fn reset_lesson_progress(&self) -> Result<()> {
        progress::reset(&self.store)
    }
}
