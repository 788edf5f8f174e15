//! Statement synthesis for single-row mutations
//!
//! Every synthesized mutation carries two aligned forms: a parameterized
//! `sql` + `params` pair for injection-safe execution, and a literal
//! `display` form for the audit log, so the learner sees a statement with
//! real values that would re-run to the same effect.

use crate::value::Value;

/// A synthesized single-row mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// Parameterized SQL for execution.
    pub sql: String,
    /// Positional arguments for `sql`.
    pub params: Vec<Value>,
    /// Literal-valued rendering for the audit log.
    pub display: String,
}

/// Synthesizes an UPDATE of one cell, addressed by primary key.
pub fn update(
    table: &str,
    pk_column: &str,
    pk_value: &Value,
    column: &str,
    value: &Value,
) -> Statement {
    Statement {
        sql: format!("UPDATE {} SET {} = ?1 WHERE {} = ?2", table, column, pk_column),
        params: vec![value.clone(), pk_value.clone()],
        display: format!(
            "UPDATE {} SET {} = {} WHERE {} = {}",
            table,
            column,
            quoted_literal(value),
            pk_column,
            key_literal(pk_value)
        ),
    }
}

/// Synthesizes an INSERT covering every listed column, in the given order.
///
/// Callers pass the full schema column list; auto-assigned keys are
/// represented by an explicit NULL so the store fills them in.
pub fn insert(table: &str, columns: &[&str], values: &[Value]) -> Statement {
    debug_assert_eq!(columns.len(), values.len());
    let column_list = columns.join(", ");
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let literals: Vec<String> = values.iter().map(quoted_literal).collect();
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            column_list,
            placeholders.join(", ")
        ),
        params: values.to_vec(),
        display: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            column_list,
            literals.join(", ")
        ),
    }
}

/// Synthesizes a DELETE of one row, addressed by primary key.
pub fn delete(table: &str, pk_column: &str, pk_value: &Value) -> Statement {
    Statement {
        sql: format!("DELETE FROM {} WHERE {} = ?1", table, pk_column),
        params: vec![pk_value.clone()],
        display: format!(
            "DELETE FROM {} WHERE {} = {}",
            table,
            pk_column,
            key_literal(pk_value)
        ),
    }
}

// Payload values render as quoted literals ('21') even when numeric, so the
// learner sees exactly what they typed; NULL renders as the keyword. Quote
// characters are doubled so the display form denotes the same value the
// parameter carried.
fn quoted_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Blob(b) => blob_literal(b),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

// Key values render in their native literal form: numbers bare, text quoted.
fn key_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(_) | Value::Real(_) => value.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Blob(b) => blob_literal(b),
    }
}

fn blob_literal(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!("X'{}'", hex)
}
