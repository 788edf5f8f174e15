//! Schema inspection
//!
//! The grid never assumes it knows a table's shape ahead of time: tables can
//! be dropped, recreated, or reset between any two user actions. `describe`
//! re-derives the live column metadata and primary key on every call, and a
//! `TableIdentity` is only valid until the next schema-changing statement.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{quote_ident, Store};

/// Classification of a column's declared type into the affinity the value
/// coercer cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeAffinity {
    Integer,
    Real,
    Text,
}

/// Live metadata for one table column, in physical order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Physical position of the column in the table.
    pub ordinal: usize,
    /// Column name.
    pub name: String,
    /// Declared type text, as written in the CREATE TABLE.
    pub declared_type: String,
    /// Whether the column carries a NOT NULL constraint.
    pub not_null: bool,
    /// Declared default, as literal text with text quoting stripped.
    pub default: Option<String>,
    /// Position within the primary key (1-based), 0 if not part of it.
    pub pk_rank: usize,
}

impl ColumnSchema {
    /// Affinity of the declared type, using SQLite's substring rules:
    /// INT anywhere means integer, REAL/FLOA/DOUB means real, anything
    /// else falls back to text.
    pub fn affinity(&self) -> TypeAffinity {
        let ty = self.declared_type.to_ascii_uppercase();
        if ty.contains("INT") {
            TypeAffinity::Integer
        } else if ty.contains("REAL") || ty.contains("FLOA") || ty.contains("DOUB") {
            TypeAffinity::Real
        } else {
            TypeAffinity::Text
        }
    }

    /// True for an `INTEGER PRIMARY KEY` column, which aliases the rowid and
    /// is assigned by the store. Such cells are read-only in the grid.
    pub fn is_rowid_alias(&self) -> bool {
        self.pk_rank == 1 && self.declared_type.eq_ignore_ascii_case("INTEGER")
    }
}

/// A table's identity at one point in time: its columns and primary key.
///
/// Never cached across a schema-changing operation. Composite keys are
/// detected and reported in full via `pk_columns`; only the first column is
/// surfaced as `primary_key`, and mutations against a composite-key binding
/// are rejected rather than addressed by a possibly non-unique column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableIdentity {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    /// First primary-key column, used for single-row addressing.
    pub primary_key: Option<String>,
    /// Every primary-key column, in key order.
    pub pk_columns: Vec<String>,
}

impl TableIdentity {
    /// Returns the column with the given name, if it exists.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// True when the primary key spans more than one column.
    pub fn has_composite_key(&self) -> bool {
        self.pk_columns.len() > 1
    }
}

/// Reads the live schema of `table` from the store.
///
/// Read-only; fails with `TableNotFound` if the table does not exist.
pub fn describe(store: &Store, table: &str) -> Result<TableIdentity> {
    let sql = format!("PRAGMA table_info(\"{}\")", quote_ident(table));
    let mut stmt = store.conn().prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let ordinal: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let declared_type: String = row.get(2)?;
        let not_null: bool = row.get::<_, i64>(3)? != 0;
        let default: Option<String> = row.get(4)?;
        let pk_rank: i64 = row.get(5)?;
        columns.push(ColumnSchema {
            ordinal: ordinal as usize,
            name,
            declared_type,
            not_null,
            default: default.map(|d| strip_text_quoting(&d)),
            pk_rank: pk_rank as usize,
        });
    }

    // PRAGMA table_info yields no rows for a missing table rather than
    // failing, so emptiness is the not-found signal.
    if columns.is_empty() {
        return Err(Error::TableNotFound(table.to_string()));
    }

    let mut keyed: Vec<(usize, String)> = columns
        .iter()
        .filter(|c| c.pk_rank > 0)
        .map(|c| (c.pk_rank, c.name.clone()))
        .collect();
    keyed.sort_by_key(|(rank, _)| *rank);
    let pk_columns: Vec<String> = keyed.into_iter().map(|(_, name)| name).collect();

    Ok(TableIdentity {
        name: table.to_string(),
        primary_key: pk_columns.first().cloned(),
        pk_columns,
        columns,
    })
}

// Declared defaults come back as literal SQL text; a text default arrives
// wrapped in single quotes ('active'). Strip one layer so the coercer sees
// the value itself.
fn strip_text_quoting(literal: &str) -> String {
    if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
        literal[1..literal.len() - 1].replace("''", "'")
    } else {
        literal.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ddl: &str) -> Store {
        let store = Store::in_memory().unwrap();
        store.conn().execute_batch(ddl).unwrap();
        store
    }

    #[test]
    fn test_describe_seeded_table() {
        let store = Store::in_memory().unwrap();
        let identity = describe(&store, "students").unwrap();

        assert_eq!(identity.name, "students");
        assert_eq!(identity.columns.len(), 5);
        assert_eq!(identity.primary_key.as_deref(), Some("student_id"));
        assert_eq!(identity.pk_columns, vec!["student_id"]);
        assert!(!identity.has_composite_key());

        let id = identity.column("student_id").unwrap();
        assert!(id.is_rowid_alias());
        assert_eq!(id.affinity(), TypeAffinity::Integer);

        let name = identity.column("name").unwrap();
        assert!(name.not_null);
        assert_eq!(name.affinity(), TypeAffinity::Text);
    }

    #[test]
    fn test_describe_missing_table() {
        let store = Store::in_memory().unwrap();
        assert_eq!(
            describe(&store, "nope"),
            Err(Error::TableNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_composite_key_reported_in_order() {
        let store = store_with(
            "CREATE TABLE pairs (b TEXT, a TEXT, v INTEGER, PRIMARY KEY (a, b))",
        );
        let identity = describe(&store, "pairs").unwrap();
        assert!(identity.has_composite_key());
        assert_eq!(identity.pk_columns, vec!["a", "b"]);
        assert_eq!(identity.primary_key.as_deref(), Some("a"));
    }

    #[test]
    fn test_no_primary_key() {
        let store = store_with("CREATE TABLE loose (x TEXT, y TEXT)");
        let identity = describe(&store, "loose").unwrap();
        assert_eq!(identity.primary_key, None);
        assert!(identity.pk_columns.is_empty());
    }

    #[test]
    fn test_defaults_and_affinities() {
        let store = store_with(
            "CREATE TABLE samples (
                id INTEGER PRIMARY KEY,
                label VARCHAR(20) DEFAULT 'none',
                score DOUBLE DEFAULT 0.5,
                hits SMALLINT DEFAULT 0
            )",
        );
        let identity = describe(&store, "samples").unwrap();

        let label = identity.column("label").unwrap();
        assert_eq!(label.default.as_deref(), Some("none"));
        assert_eq!(label.affinity(), TypeAffinity::Text);

        let score = identity.column("score").unwrap();
        assert_eq!(score.default.as_deref(), Some("0.5"));
        assert_eq!(score.affinity(), TypeAffinity::Real);

        let hits = identity.column("hits").unwrap();
        assert_eq!(hits.affinity(), TypeAffinity::Integer);
        assert!(!hits.is_rowid_alias());
    }

    #[test]
    fn test_fresh_describe_after_drop() {
        let store = Store::in_memory().unwrap();
        assert!(describe(&store, "students").is_ok());
        store.conn().execute_batch("DROP TABLE students").unwrap();
        assert_eq!(
            describe(&store, "students"),
            Err(Error::TableNotFound("students".to_string()))
        );
    }
}
