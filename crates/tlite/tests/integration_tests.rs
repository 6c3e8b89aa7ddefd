//! Integration tests for tlite.
//!
//! The query engine is an external process, so these tests stand in a small
//! shell script for it instead of requiring a real sqlite3 binary.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

use tlite::app::{App, Focus};
use tlite::config::Config;
use tlite::db::{Executor, Outcome};
use tlite::ui::Theme;

/// Writes an executable shell script that plays the query engine role.
fn fake_engine(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("engine.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    path.to_string_lossy().into_owned()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn app_with_engine(engine: &str) -> App {
    let mut app = App::new("test.db".to_string(), &Config::default());
    app.executor = Executor::new(engine);
    app.on_resize(80, 24);
    app
}

#[test]
fn executor_success_parses_tabular_output() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id,name\\n1,Alice\\n'");

    let outcome = Executor::new(&engine).execute("test.db", "SELECT * FROM users");
    match outcome {
        Outcome::Success(result) => {
            assert_eq!(result.headers, vec!["id", "name"]);
            assert_eq!(result.rows, vec![vec!["1", "Alice"]]);
        }
        Outcome::Failure(diag) => panic!("unexpected failure: {diag}"),
    }
}

#[test]
fn executor_passes_fixed_flags_then_path_and_query() {
    let dir = TempDir::new().unwrap();
    // Echo the argv back as one CSV record under a header line.
    let engine = fake_engine(
        &dir,
        "printf 'a1,a2,a3,a4\\n%s,%s,%s,%s\\n' \"$1\" \"$2\" \"$3\" \"$4\"",
    );

    let outcome = Executor::new(&engine).execute("/tmp/test.db", "SELECT 1");
    match outcome {
        Outcome::Success(result) => {
            assert_eq!(
                result.rows,
                vec![vec!["-csv", "-header", "/tmp/test.db", "SELECT 1"]]
            );
        }
        Outcome::Failure(diag) => panic!("unexpected failure: {diag}"),
    }
}

#[test]
fn executor_empty_output_is_an_empty_success() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "exit 0");

    match Executor::new(&engine).execute("test.db", "DELETE FROM users") {
        Outcome::Success(result) => assert!(result.is_empty()),
        Outcome::Failure(diag) => panic!("unexpected failure: {diag}"),
    }
}

#[test]
fn executor_nonzero_exit_surfaces_stderr() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "echo 'no such table: users' >&2\nexit 1");

    match Executor::new(&engine).execute("test.db", "SELECT * FROM users") {
        Outcome::Failure(diag) => {
            assert!(diag.starts_with("executing command:"), "got: {diag}");
            assert!(diag.contains("no such table: users"), "got: {diag}");
        }
        Outcome::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn executor_malformed_output_is_a_parse_failure() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n\"unterminated\\n'");

    match Executor::new(&engine).execute("test.db", "SELECT 1") {
        Outcome::Failure(diag) => {
            assert!(diag.starts_with("parsing data:"), "got: {diag}");
        }
        Outcome::Success(_) => panic!("expected failure"),
    }
}

/// Submitting a query that succeeds renders a table and moves focus to it.
#[test]
fn submit_success_installs_table_and_switches_focus() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n'");
    let mut app = app_with_engine(&engine);

    app.editor.set_text("SELECT 1".to_string());
    app.on_key(key(KeyCode::Enter));

    assert_eq!(app.theme, Theme::Normal);
    assert_eq!(app.focus, Focus::Table);
    assert!(app.last_error.is_none());

    let grid = app.grid.as_ref().expect("a result should be installed");
    assert_eq!(grid.headers, vec!["id"]);
    assert_eq!(grid.rows, vec![vec!["1"]]);
    assert_eq!(grid.columns[0].title, "ID");
}

/// Submitting against an unreachable engine enters the error theme and
/// keeps focus on the editor.
#[test]
fn submit_failure_enters_error_theme() {
    let mut app = app_with_engine("tlite-test-no-such-binary");

    app.editor.set_text("SELECT 1".to_string());
    app.on_key(key(KeyCode::Enter));

    assert_eq!(app.theme, Theme::Error);
    assert_eq!(app.focus, Focus::Editor);
    let diag = app.last_error.as_deref().expect("a diagnostic should be set");
    assert!(!diag.is_empty());
    assert!(diag.starts_with("executing command:"), "got: {diag}");
}

/// A failed submit leaves the previous result addressable; the next
/// successful one clears the error and the stale diagnostic together.
#[test]
fn failure_keeps_previous_result_until_next_success() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n'");
    let mut app = app_with_engine(&engine);

    app.editor.set_text("SELECT 1".to_string());
    app.submit();
    assert!(app.grid.is_some());

    app.executor = Executor::new("tlite-test-no-such-binary");
    app.editor.set_text("SELECT 2".to_string());
    app.submit();

    assert_eq!(app.theme, Theme::Error);
    let grid = app.grid.as_ref().expect("previous result should remain");
    assert_eq!(grid.rows, vec![vec!["1"]]);

    app.executor = Executor::new(&engine);
    app.submit();

    assert_eq!(app.theme, Theme::Normal);
    assert!(app.last_error.is_none());
    assert_eq!(app.focus, Focus::Table);
}

/// A blank (whitespace-only) query performs no action and emits no error.
#[test]
fn blank_submit_changes_nothing() {
    let mut app = app_with_engine("tlite-test-no-such-binary");
    app.editor.set_text("   ".to_string());

    app.on_key(key(KeyCode::Enter));

    assert_eq!(app.theme, Theme::Normal);
    assert_eq!(app.focus, Focus::Editor);
    assert!(app.last_error.is_none());
    assert!(app.grid.is_none());
    assert_eq!(app.editor.text(), "   ");
}

/// Two toggles return to the original focus with everything else intact.
#[test]
fn toggle_focus_is_its_own_inverse() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n'");
    let mut app = app_with_engine(&engine);

    app.editor.set_text("SELECT 1".to_string());
    app.submit();
    assert_eq!(app.focus, Focus::Table);

    let rows_before = app.grid.as_ref().unwrap().rows.clone();
    let cursor_before = app.grid_state.clone();

    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Editor);
    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Table);

    assert_eq!(app.grid.as_ref().unwrap().rows, rows_before);
    assert_eq!(app.grid_state, cursor_before);
    assert_eq!(app.theme, Theme::Normal);
}

#[test]
fn resize_relayouts_existing_result() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id,name\\n1,Alice\\n'");
    let mut app = app_with_engine(&engine);

    app.editor.set_text("SELECT * FROM users".to_string());
    app.submit();

    app.on_resize(40, 20);
    assert_eq!(app.viewport_width, 38);
    assert_eq!(app.viewport_height, 12);
    assert!(app.ready);

    let total: u16 = app
        .grid
        .as_ref()
        .unwrap()
        .columns
        .iter()
        .map(|c| c.width)
        .sum();
    assert!(total <= 38);

    // Focus and theme survive a resize.
    assert_eq!(app.focus, Focus::Table);
    assert_eq!(app.theme, Theme::Normal);
}

#[test]
fn ready_latches_on_first_resize() {
    let app = App::new("test.db".to_string(), &Config::default());
    assert!(!app.ready);

    let mut app = app;
    app.on_resize(80, 24);
    assert!(app.ready);
}

#[test]
fn quit_keys_end_the_loop_from_any_focus() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n'");
    let mut app = app_with_engine(&engine);

    assert!(app.on_key(key(KeyCode::Esc)));
    assert!(app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

    app.editor.set_text("SELECT 1".to_string());
    app.submit();
    assert_eq!(app.focus, Focus::Table);
    assert!(app.on_key(key(KeyCode::Esc)));
}

/// Keys other than the global bindings go to whichever widget has focus.
#[test]
fn other_keys_are_forwarded_to_the_focused_widget() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n2\\n3\\n'");
    let mut app = app_with_engine(&engine);

    // Editor focused: characters land in the query.
    app.on_key(key(KeyCode::Char('S')));
    app.on_key(key(KeyCode::Char('E')));
    assert_eq!(app.editor.text(), "SE");

    app.editor.set_text("SELECT id FROM t".to_string());
    app.submit();
    assert_eq!(app.focus, Focus::Table);

    // Table focused: j/k move the cursor row, the query is untouched.
    app.on_key(key(KeyCode::Char('j')));
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.grid_state.cursor_row, 2);
    app.on_key(key(KeyCode::Char('k')));
    assert_eq!(app.grid_state.cursor_row, 1);
    assert_eq!(app.editor.text(), "SELECT id FROM t");
}

#[test]
fn query_history_recalls_submitted_queries() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(&dir, "printf 'id\\n1\\n'");
    let mut app = app_with_engine(&engine);

    app.editor.set_text("SELECT 1".to_string());
    app.submit();
    app.toggle_focus();
    assert_eq!(app.focus, Focus::Editor);

    app.editor.set_text(String::new());
    app.on_key(key(KeyCode::Up));
    assert_eq!(app.editor.text(), "SELECT 1");
}
