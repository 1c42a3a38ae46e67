use rusqlite::Connection;

use crate::db::initialize;

/// An in-memory database with the application tables and the default categories.
pub(crate) fn get_test_db_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize test database");
    connection
}
