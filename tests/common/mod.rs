//! Shared test context for integration tests
#![allow(dead_code)]

use sqltutor::{ExecutionOutcome, Grid, Row, Session, Value};

pub struct TestContext {
    pub session: Session,
}

/// A fresh in-memory session with the seed learning data.
pub fn setup() -> TestContext {
    TestContext {
        session: Session::in_memory().unwrap(),
    }
}

impl TestContext {
    /// Executes a statement and asserts it did not fail.
    pub fn exec(&self, sql: &str) -> ExecutionOutcome {
        let outcome = self.session.execute_freeform(sql);
        assert!(
            !matches!(outcome, ExecutionOutcome::Failure { .. }),
            "statement failed: {}: {:?}",
            sql,
            outcome
        );
        outcome
    }

    /// Runs a row-returning statement and returns its rows.
    pub fn rows(&self, sql: &str) -> Vec<Row> {
        match self.exec(sql) {
            ExecutionOutcome::Rows { rows, .. } => rows,
            other => panic!("expected rows from {}: {:?}", sql, other),
        }
    }

    /// First column of the first row of a query result.
    pub fn value(&self, sql: &str) -> Value {
        let rows = self.rows(sql);
        assert!(!rows.is_empty(), "no rows from {}", sql);
        rows[0][0].clone()
    }

    /// A grid bound to `table`.
    pub fn grid(&self, table: &str) -> Grid {
        self.session.grid(table).unwrap()
    }

    pub fn history_len(&self) -> usize {
        self.session.query_history(10_000).unwrap().len()
    }
}
