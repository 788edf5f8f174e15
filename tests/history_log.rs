//! Tests for the append-only execution history.

mod common;

use common::setup;
use sqltutor::ExecutionOutcome;

#[test]
fn test_one_entry_per_execution() {
    let ctx = setup();
    let before = ctx.history_len();

    ctx.exec("SELECT * FROM students");
    ctx.exec("UPDATE courses SET credits = 5 WHERE course_id = 1");
    let _ = ctx.session.execute_freeform("SELECT broken FROM students");

    assert_eq!(ctx.history_len(), before + 3);
}

#[test]
fn test_reverse_chronological_prefix() {
    let ctx = setup();
    for i in 0..5 {
        ctx.exec(&format!("SELECT {} FROM students", i));
    }

    let all = ctx.session.query_history(100).unwrap();
    assert_eq!(all[0].text, "SELECT 4 FROM students");
    assert_eq!(all[4].text, "SELECT 0 FROM students");

    // recent(N) is a prefix of the full log
    let top = ctx.session.query_history(3).unwrap();
    assert_eq!(top, all[..3]);
}

#[test]
fn test_synthesized_statements_logged_in_display_form() {
    let ctx = setup();
    let mut grid = ctx.grid("students");

    grid.edit_cell(ctx.session.store(), 0, 3, Some("21")).unwrap();
    grid.delete_row(ctx.session.store(), 7).unwrap();

    let history = ctx.session.query_history(2).unwrap();
    assert_eq!(history[0].text, "DELETE FROM students WHERE student_id = 8");
    assert_eq!(
        history[1].text,
        "UPDATE students SET age = '21' WHERE student_id = 1"
    );
    assert!(history.iter().all(|e| e.succeeded && e.error.is_none()));
}

#[test]
fn test_logged_statement_is_rerunnable() {
    let ctx = setup();
    let mut grid = ctx.grid("students");
    grid.edit_cell(ctx.session.store(), 1, 1, Some("D'Arcy"))
        .unwrap();

    let logged = ctx.session.query_history(1).unwrap()[0].text.clone();
    assert_eq!(logged, "UPDATE students SET name = 'D''Arcy' WHERE student_id = 2");

    let rerun = ctx.session.execute_freeform(&logged);
    assert!(matches!(rerun, ExecutionOutcome::Mutation { rows_affected: 1, .. }));
}

#[test]
fn test_timestamps_never_decrease() {
    let ctx = setup();
    ctx.exec("SELECT 1 FROM students");
    ctx.exec("SELECT 2 FROM students");

    let entries = ctx.session.query_history(2).unwrap();
    assert!(entries[0].executed_at >= entries[1].executed_at);
}

#[test]
fn test_reset_is_the_only_bulk_clear() {
    let ctx = setup();
    ctx.exec("SELECT * FROM students");
    assert!(ctx.history_len() > 0);

    ctx.session.reset_database().unwrap();
    assert_eq!(ctx.history_len(), 0);
}
