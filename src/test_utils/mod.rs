//! Helpers shared by the request handler tests.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::AppState;

/// Create app state backed by an in-memory database and a temporary upload directory.
///
/// The [TempDir] must be kept alive for as long as the state is used.
pub(crate) fn get_test_app_state() -> (AppState, TempDir) {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let upload_dir = TempDir::new().expect("Could not create upload directory");

    let state =
        AppState::new(connection, upload_dir.path()).expect("Could not create app state");

    (state, upload_dir)
}
