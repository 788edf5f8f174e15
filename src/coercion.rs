//! Value coercion for grid edits
//!
//! Converts raw user-entered text into a store-native value for a given
//! column. Pure and deterministic: no store access, so validation failures
//! never cost a round-trip and never leave a partial write behind.

use crate::error::{Error, Result};
use crate::schema::{ColumnSchema, TypeAffinity};
use crate::value::Value;

/// Coerces raw cell input against a column's declared type.
///
/// `None` and the empty string are both the null marker. Rules, in order:
/// null handling against NOT NULL, integer parse for integer affinity, real
/// parse for real affinity, and a text fallthrough that accepts anything.
pub fn coerce(raw: Option<&str>, column: &ColumnSchema) -> Result<Value> {
    let raw = match raw {
        None | Some("") => {
            if column.not_null {
                return Err(Error::NullNotAllowed(column.name.clone()));
            }
            return Ok(Value::Null);
        }
        Some(raw) => raw,
    };

    match column.affinity() {
        TypeAffinity::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| Error::TypeMismatch {
                column: column.name.clone(),
                expected: "INTEGER",
                value: raw.to_string(),
            }),
        TypeAffinity::Real => raw
            .trim()
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| Error::TypeMismatch {
                column: column.name.clone(),
                expected: "REAL",
                value: raw.to_string(),
            }),
        TypeAffinity::Text => Ok(Value::Text(raw.to_string())),
    }
}
