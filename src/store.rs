//! Owned store handle
//!
//! `Store` wraps a single SQLite connection. It is created explicitly and
//! passed into every component call, so independent instances (and tests)
//! never share state through a global connection.
//!
//! The store reserves two bookkeeping tables, `query_history` and
//! `lesson_progress`, which are excluded from the user-table listing. The
//! seed tables (`students`, `courses`, `enrollments`) are created if absent
//! and populated only when all three are empty.

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::{history, progress};

/// Bookkeeping tables hidden from the user-table listing.
pub const RESERVED_TABLES: &[&str] = &["query_history", "lesson_progress"];

const BOOKKEEPING_DDL: &str = "
    CREATE TABLE IF NOT EXISTS query_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        query_text TEXT NOT NULL,
        executed_at TEXT NOT NULL,
        success INTEGER NOT NULL,
        error_message TEXT
    );

    CREATE TABLE IF NOT EXISTS lesson_progress (
        lesson_id TEXT PRIMARY KEY,
        completed INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT
    );
";

const SEED_DDL: &str = "
    CREATE TABLE IF NOT EXISTS students (
        student_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        age INTEGER,
        country TEXT
    );

    CREATE TABLE IF NOT EXISTS courses (
        course_id INTEGER PRIMARY KEY,
        course_name TEXT NOT NULL,
        instructor TEXT,
        credits INTEGER
    );

    CREATE TABLE IF NOT EXISTS enrollments (
        enrollment_id INTEGER PRIMARY KEY,
        student_id INTEGER,
        course_id INTEGER,
        enrollment_date TEXT,
        grade REAL,
        FOREIGN KEY (student_id) REFERENCES students(student_id),
        FOREIGN KEY (course_id) REFERENCES courses(course_id)
    );
";

const STUDENTS: &[(i64, &str, &str, i64, &str)] = &[
    (1, "Alice Johnson", "alice@email.com", 20, "USA"),
    (2, "Bob Smith", "bob@email.com", 22, "Canada"),
    (3, "Carlos García", "carlos@email.com", 21, "Spain"),
    (4, "Diana Lee", "diana@email.com", 19, "South Korea"),
    (5, "Elena Rodríguez", "elena@email.com", 23, "Mexico"),
    (6, "Frank Miller", "frank@email.com", 20, "UK"),
    (7, "Gabriela Silva", "gabi@email.com", 22, "Brazil"),
    (8, "Hassan Ahmed", "hassan@email.com", 21, "Egypt"),
];

const COURSES: &[(i64, &str, &str, i64)] = &[
    (1, "Introduction to Programming", "Dr. Smith", 3),
    (2, "Database Systems", "Prof. Johnson", 4),
    (3, "Web Development", "Dr. García", 3),
    (4, "Data Structures", "Prof. Lee", 4),
    (5, "Machine Learning", "Dr. Chen", 3),
    (6, "Computer Networks", "Prof. Williams", 3),
];

const ENROLLMENTS: &[(i64, i64, i64, &str, f64)] = &[
    (1, 1, 1, "2024-01-15", 3.8),
    (2, 1, 2, "2024-01-15", 3.5),
    (3, 2, 1, "2024-01-16", 3.2),
    (4, 2, 3, "2024-01-16", 3.9),
    (5, 3, 2, "2024-01-17", 4.0),
    (6, 3, 4, "2024-01-17", 3.7),
    (7, 4, 1, "2024-01-18", 3.6),
    (8, 4, 5, "2024-01-18", 3.8),
    (9, 5, 3, "2024-01-19", 3.4),
    (10, 5, 4, "2024-01-19", 3.9),
    (11, 6, 2, "2024-01-20", 3.3),
    (12, 6, 6, "2024-01-20", 3.7),
    (13, 7, 1, "2024-01-21", 3.5),
    (14, 8, 5, "2024-01-22", 3.6),
];

/// An explicitly owned SQLite store handle.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) a store at the given path and initializes it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Store {
            conn: Connection::open(path)?,
        };
        store.init()?;
        Ok(store)
    }

    /// Opens a fresh in-memory store. Each call is fully independent.
    pub fn in_memory() -> Result<Self> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Creates bookkeeping and seed tables if absent, and seeds sample data
    /// when all three seed tables are empty.
    ///
    /// Foreign keys are declared for reference but not enforced: learners
    /// delete seeded students and drop whole tables, and a constraint error
    /// on those would block the lesson. The bundled SQLite enforces them by
    /// default, so the pragma is required.
    fn init(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = OFF")?;
        self.conn.execute_batch(BOOKKEEPING_DDL)?;
        self.conn.execute_batch(SEED_DDL)?;

        let empty = self.count("students")? == 0
            && self.count("courses")? == 0
            && self.count("enrollments")? == 0;
        if empty {
            self.seed()?;
            debug!("seeded sample learning data");
        }
        Ok(())
    }

    fn count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", quote_ident(table));
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    fn seed(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO students VALUES (?1, ?2, ?3, ?4, ?5)")?;
        for (id, name, email, age, country) in STUDENTS {
            stmt.execute(params![id, name, email, age, country])?;
        }

        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO courses VALUES (?1, ?2, ?3, ?4)")?;
        for (id, name, instructor, credits) in COURSES {
            stmt.execute(params![id, name, instructor, credits])?;
        }

        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO enrollments VALUES (?1, ?2, ?3, ?4, ?5)")?;
        for (id, student, course, date, grade) in ENROLLMENTS {
            stmt.execute(params![id, student, course, date, grade])?;
        }

        Ok(())
    }

    /// Lists user tables, excluding SQLite internals and the reserved
    /// bookkeeping tables.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table'
               AND name NOT LIKE 'sqlite_%'
               AND name NOT IN ('query_history', 'lesson_progress')
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Drops every user table, bulk-clears both bookkeeping logs, and
    /// reinitializes the seed schema and data.
    ///
    /// This is the only path that deletes history entries. Any
    /// `TableIdentity` derived before a reset is stale and must be rebound.
    pub fn reset(&self) -> Result<()> {
        for table in self.table_names()? {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS \"{}\"", quote_ident(&table)))?;
        }
        history::clear(self)?;
        progress::reset(self)?;
        debug!("store reset, reseeding");
        self.init()
    }
}

/// Escapes a name for use inside a double-quoted SQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    name.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_on_first_open() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.count("students").unwrap(), 8);
        assert_eq!(store.count("courses").unwrap(), 6);
        assert_eq!(store.count("enrollments").unwrap(), 14);
    }

    #[test]
    fn test_table_names_exclude_reserved() {
        let store = Store::in_memory().unwrap();
        let names = store.table_names().unwrap();
        assert_eq!(names, vec!["courses", "enrollments", "students"]);
        for reserved in RESERVED_TABLES {
            assert!(!names.iter().any(|n| n == reserved));
        }
    }

    #[test]
    fn test_reset_with_referencing_rows_present() {
        // Seeded enrollments reference students and courses; dropping in
        // name order reaches courses first and must not be blocked
        let store = Store::in_memory().unwrap();
        store.reset().unwrap();
        assert_eq!(store.count("students").unwrap(), 8);
        assert_eq!(store.count("courses").unwrap(), 6);
        assert_eq!(store.count("enrollments").unwrap(), 14);
    }

    #[test]
    fn test_reset_restores_dropped_table() {
        let store = Store::in_memory().unwrap();
        store.conn().execute_batch("DROP TABLE students").unwrap();
        assert!(!store.table_names().unwrap().contains(&"students".to_string()));

        store.reset().unwrap();
        assert!(store.table_names().unwrap().contains(&"students".to_string()));
        assert_eq!(store.count("students").unwrap(), 8);
    }
}
