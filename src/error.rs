//! Error types for the workbench engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Schema errors
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("No primary key on table: {0}")]
    NoPrimaryKey(String),

    #[error("Composite primary key on table {table}: {columns:?}")]
    CompositePrimaryKey { table: String, columns: Vec<String> },

    // Validation errors
    #[error("Column {0} cannot be NULL")]
    NullNotAllowed(String),

    #[error("Invalid {expected} value for column {column}: '{value}'")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        value: String,
    },

    // Edit rejections
    #[error("Column {0} is an auto-generated key and cannot be edited")]
    ReadOnlyColumn(String),

    #[error("Grid is not bound to a table")]
    Unbound,

    #[error("Row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    // Statement errors
    #[error("Empty statement")]
    EmptyStatement,

    #[error("Multiple statements are not allowed")]
    MultipleStatements,

    // Store errors, native message verbatim
    #[error("{0}")]
    Store(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(err.to_string())
    }
}
