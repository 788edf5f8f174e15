//! A schema-driven CRUD engine for an interactive SQL learning workbench
//!
//! This crate pairs a SQLite store with the machinery a table-grid UI needs
//! to stay honest about SQL:
//! - inspects a table's live schema and derives its primary key on every bind
//! - validates and coerces user-entered cell text against column types
//! - synthesizes the exact INSERT/UPDATE/DELETE for a single-row mutation,
//!   in both parameterized and human-auditable display form
//! - executes statements one at a time and records every attempt in an
//!   append-only history log
//! - keeps the in-memory grid reconciled with the store: a mutation must
//!   succeed against the store before the grid reflects it

pub mod coercion;
pub mod error;
pub mod execution;
pub mod grid;
pub mod history;
pub mod progress;
pub mod schema;
pub mod session;
pub mod statement;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use execution::ExecutionOutcome;
pub use grid::{CellEdit, Grid, RowDelete, RowInsert};
pub use history::HistoryEntry;
pub use schema::{ColumnSchema, TableIdentity, TypeAffinity};
pub use session::Session;
pub use statement::Statement;
pub use store::Store;
pub use value::{Row, Value};
