//! Statement execution
//!
//! One statement at a time against the store handle: classify, run, commit
//! or fail, and record the attempt in history before returning.
//! Row-returning statements read without opening a durable transaction;
//! every mutation is committed immediately after it runs.

use rusqlite::params_from_iter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::history;
use crate::statement::Statement;
use crate::store::{quote_ident, Store};
use crate::value::{Row, Value};

/// Uniform outcome of a single execution. Exactly one variant per call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// A row-returning statement: captured column names and all rows.
    Rows { columns: Vec<String>, rows: Vec<Row> },
    /// A mutating statement that committed.
    Mutation { rows_affected: usize, message: String },
    /// A failure; `error` carries the store's native message verbatim.
    Failure { error: String },
}

/// Executes one free-form statement and records the attempt in history.
///
/// Classification comes from the prepared statement's own metadata, not
/// the leading keyword: anything exposing result columns is captured as
/// rows (SELECT, WITH ... SELECT, row-returning PRAGMAs), everything else
/// runs as a mutation.
pub fn execute_freeform(store: &Store, sql: &str) -> ExecutionOutcome {
    match run_freeform(store, sql) {
        Ok(outcome) => {
            // The statement already committed; a failed append must not
            // misreport it.
            if let Err(e) = history::append(store, sql.trim(), true, None) {
                warn!(error = %e, "could not record successful statement");
            }
            outcome
        }
        Err(e) => {
            let error = e.to_string();
            debug!(error = %error, "statement failed");
            if let Err(e) = history::append(store, sql.trim(), false, Some(&error)) {
                warn!(error = %e, "could not record failed statement");
            }
            ExecutionOutcome::Failure { error }
        }
    }
}

fn run_freeform(store: &Store, sql: &str) -> Result<ExecutionOutcome> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(Error::EmptyStatement);
    }
    // One trailing terminator is fine; anything after a semicolon is a
    // script. (A semicolon inside a string literal is a known false
    // positive of this check.)
    let body = sql.strip_suffix(';').unwrap_or(sql).trim_end();
    if body.contains(';') {
        return Err(Error::MultipleStatements);
    }

    {
        let mut stmt = store.conn().prepare(body)?;
        if stmt.column_count() > 0 {
            let columns: Vec<String> =
                stmt.column_names().iter().map(|c| c.to_string()).collect();
            let mut captured = Vec::new();
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut snapshot = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    snapshot.push(Value::from(row.get_ref(i)?));
                }
                captured.push(snapshot);
            }
            debug!(rows = captured.len(), "row-returning statement");
            return Ok(ExecutionOutcome::Rows {
                columns,
                rows: captured,
            });
        }
        // No result columns: a mutation, rerun below under a transaction.
    }

    let tx = store.conn().unchecked_transaction()?;
    let rows_affected = tx.execute(body, [])?;
    tx.commit()?;
    debug!(rows_affected, "mutating statement committed");
    Ok(ExecutionOutcome::Mutation {
        rows_affected,
        message: format!("Query executed successfully. Rows affected: {}", rows_affected),
    })
}

/// Executes a synthesized mutation with its parameters, recording its
/// display form in history. Commits on success; returns rows affected.
pub fn execute_statement(store: &Store, stmt: &Statement) -> Result<usize> {
    match run_statement(store, stmt) {
        Ok(rows_affected) => {
            if let Err(e) = history::append(store, &stmt.display, true, None) {
                warn!(error = %e, "could not record successful statement");
            }
            Ok(rows_affected)
        }
        Err(e) => {
            let error = e.to_string();
            if let Err(e) = history::append(store, &stmt.display, false, Some(&error)) {
                warn!(error = %e, "could not record failed statement");
            }
            Err(e)
        }
    }
}

fn run_statement(store: &Store, stmt: &Statement) -> Result<usize> {
    let tx = store.conn().unchecked_transaction()?;
    let rows_affected = tx.execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
    tx.commit()?;
    Ok(rows_affected)
}

/// Fetches the full contents of a table, column headers first.
///
/// Internal fetch path for grid binds and refreshes; not recorded in
/// history.
pub fn fetch_table(store: &Store, table: &str) -> Result<(Vec<String>, Vec<Row>)> {
    let sql = format!("SELECT * FROM \"{}\"", quote_ident(table));
    let mut stmt = store.conn().prepare(&sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut captured = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut snapshot = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            snapshot.push(Value::from(row.get_ref(i)?));
        }
        captured.push(snapshot);
    }
    Ok((columns, captured))
}
