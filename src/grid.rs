//! Grid state and edit reconciliation
//!
//! An in-memory, row-major snapshot of a query result. Unbound grids are
//! read-only views (console output, lesson results). Binding a grid to a
//! table derives the table's identity fresh from the store and enables
//! single-row edits.
//!
//! The store-first invariant governs every mutation: the store write must
//! succeed before the in-memory snapshot changes, so the grid's view is
//! never ahead of the store. Inserts and deletes go further and re-fetch
//! the whole row set, so store-assigned keys and defaults are always the
//! authoritative ones.

use tracing::debug;

use crate::coercion;
use crate::error::{Error, Result};
use crate::execution;
use crate::schema::{self, TableIdentity, TypeAffinity};
use crate::statement;
use crate::store::Store;
use crate::value::{Row, Value};

/// Result of a successful cell edit.
#[derive(Clone, Debug, PartialEq)]
pub struct CellEdit {
    /// Display form of the executed UPDATE, for the audit trail.
    pub display_sql: String,
    /// The coerced value now present in both store and grid.
    pub value: Value,
}

/// Result of a successful default-row insert.
#[derive(Clone, Debug, PartialEq)]
pub struct RowInsert {
    pub display_sql: String,
}

/// Result of a successful row delete.
#[derive(Clone, Debug, PartialEq)]
pub struct RowDelete {
    pub display_sql: String,
    /// Zero when the addressed row was already gone.
    pub rows_affected: usize,
}

/// An in-memory snapshot of rows, optionally bound to a table for editing.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Row>,
    binding: Option<TableIdentity>,
}

impl Grid {
    /// An empty, unbound grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// A read-only grid over an arbitrary result set.
    pub fn from_result(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Grid {
            columns,
            rows,
            binding: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// The table identity this grid is bound to, if any.
    pub fn binding(&self) -> Option<&TableIdentity> {
        self.binding.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Binds the grid to `table`: derives the table identity fresh from the
    /// store, then loads the full row set. On failure the grid is left
    /// unbound and empty; any previous binding is discarded either way.
    pub fn bind(&mut self, store: &Store, table: &str) -> Result<()> {
        self.binding = None;
        self.columns.clear();
        self.rows.clear();

        let identity = schema::describe(store, table)?;
        debug!(table, columns = identity.columns.len(), "grid bound");
        self.binding = Some(identity);
        self.refresh(store)
    }

    /// Replaces the entire row set with a fresh fetch of the bound table.
    /// Idempotent between mutations.
    pub fn refresh(&mut self, store: &Store) -> Result<()> {
        let binding = self.binding.as_ref().ok_or(Error::Unbound)?;
        let (columns, rows) = execution::fetch_table(store, &binding.name)?;
        self.columns = columns;
        self.rows = rows;
        Ok(())
    }

    /// Edits one cell: coerce the raw input, write it to the store, then
    /// reconcile the in-memory cell. Validation failures and rejected edits
    /// return before any store round-trip; store failures leave the
    /// in-memory cell untouched.
    pub fn edit_cell(
        &mut self,
        store: &Store,
        row: usize,
        col: usize,
        raw: Option<&str>,
    ) -> Result<CellEdit> {
        let binding = self.binding.as_ref().ok_or(Error::Unbound)?;
        let (pk_column, pk_index) = self.key_position(binding)?;

        if row >= self.rows.len() {
            return Err(Error::RowOutOfRange {
                row,
                rows: self.rows.len(),
            });
        }
        let header = self
            .columns
            .get(col)
            .ok_or_else(|| Error::ColumnNotFound(format!("#{}", col)))?;
        let column = binding
            .column(header)
            .ok_or_else(|| Error::ColumnNotFound(header.clone()))?;

        // Store-assigned keys are not editable.
        if column.name == pk_column && column.is_rowid_alias() {
            return Err(Error::ReadOnlyColumn(column.name.clone()));
        }

        let pk_value = self.rows[row][pk_index].clone();
        let coerced = coercion::coerce(raw, column)?;

        let stmt = statement::update(&binding.name, &pk_column, &pk_value, &column.name, &coerced);
        execution::execute_statement(store, &stmt)?;

        // Store write confirmed; only now touch the snapshot.
        self.rows[row][col] = coerced.clone();
        Ok(CellEdit {
            display_sql: stmt.display,
            value: coerced,
        })
    }

    /// Inserts a row of per-column defaults, then re-fetches the row set so
    /// store-assigned keys and defaults are authoritative.
    ///
    /// Defaults: auto-assigned integer key becomes NULL (the store fills it
    /// in); a declared default is used as-is; nullable columns get NULL;
    /// otherwise zero for numeric affinities and the empty string for text.
    pub fn add_default_row(&mut self, store: &Store) -> Result<RowInsert> {
        let binding = self.binding.as_ref().ok_or(Error::Unbound)?;

        let mut values = Vec::with_capacity(binding.columns.len());
        for column in &binding.columns {
            let value = if column.is_rowid_alias() {
                Value::Null
            } else if let Some(default) = &column.default {
                coercion::coerce(Some(default), column)?
            } else if !column.not_null {
                Value::Null
            } else {
                match column.affinity() {
                    TypeAffinity::Integer => Value::integer(0),
                    TypeAffinity::Real => Value::real(0.0),
                    TypeAffinity::Text => Value::text(""),
                }
            };
            values.push(value);
        }

        let names: Vec<&str> = binding.columns.iter().map(|c| c.name.as_str()).collect();
        let stmt = statement::insert(&binding.name, &names, &values);
        execution::execute_statement(store, &stmt)?;

        let display_sql = stmt.display;
        self.refresh(store)?;
        Ok(RowInsert { display_sql })
    }

    /// Deletes the row at `row` by primary key, then re-fetches the row
    /// set. Deleting an already-gone row succeeds with zero rows affected.
    pub fn delete_row(&mut self, store: &Store, row: usize) -> Result<RowDelete> {
        let binding = self.binding.as_ref().ok_or(Error::Unbound)?;
        let (pk_column, pk_index) = self.key_position(binding)?;

        if row >= self.rows.len() {
            return Err(Error::RowOutOfRange {
                row,
                rows: self.rows.len(),
            });
        }
        let pk_value = self.rows[row][pk_index].clone();

        let stmt = statement::delete(&binding.name, &pk_column, &pk_value);
        let rows_affected = execution::execute_statement(store, &stmt)?;

        let display_sql = stmt.display;
        self.refresh(store)?;
        Ok(RowDelete {
            display_sql,
            rows_affected,
        })
    }

    // Resolves the single-column primary key and its position in the grid
    // header. Composite keys are rejected here rather than addressed by a
    // possibly non-unique first column.
    fn key_position(&self, binding: &TableIdentity) -> Result<(String, usize)> {
        if binding.has_composite_key() {
            return Err(Error::CompositePrimaryKey {
                table: binding.name.clone(),
                columns: binding.pk_columns.clone(),
            });
        }
        let pk_column = binding
            .primary_key
            .clone()
            .ok_or_else(|| Error::NoPrimaryKey(binding.name.clone()))?;
        let pk_index = self
            .columns
            .iter()
            .position(|c| *c == pk_column)
            .ok_or_else(|| Error::ColumnNotFound(pk_column.clone()))?;
        Ok((pk_column, pk_index))
    }
}
