use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::AppError;

const SCHEMA_SQL: &str = include_str!("../../sql/sent_log_schema.sql");

// Thread-local connection slot, remembered together with the path it was opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = RefCell::new(None);
}

#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AppError>,
    {
        DB_CONN
            .try_with(|cell| -> Result<T, AppError> {
                let mut slot = cell.borrow_mut();
                let reopen = match slot.as_ref() {
                    Some((path, _)) => path != &self.path,
                    None => true,
                };
                if reopen {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| AppError::Db(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(AppError::Db("connection slot empty".into())),
                }
            })
            .map_err(|e| AppError::Db(format!("thread-local connection unavailable: {e}")))?
    }
}

/// Opens the database and applies the sent-log schema.
pub fn init_db(path: &str) -> Result<Database, AppError> {
    let db = Database::new(path);

    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| AppError::Db(format!("Failed to apply schema: {e}")))
    })?;

    Ok(db)
}
