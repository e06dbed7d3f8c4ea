use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::TaskplanError;

use super::migrations;

const WORKSPACE_DIR: &str = ".taskplan";
const DB_FILE: &str = "taskplan.db";

/// Find the workspace root by walking up from the current directory looking
/// for a `.taskplan` directory.
pub fn find_workspace_root() -> Result<PathBuf, TaskplanError> {
    let mut dir = env::current_dir().map_err(|e| TaskplanError::database(e.to_string()))?;
    loop {
        if dir.join(WORKSPACE_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TaskplanError::not_initialized());
        }
    }
}

pub fn db_path() -> Result<PathBuf, TaskplanError> {
    let root = find_workspace_root()?;
    Ok(root.join(WORKSPACE_DIR).join(DB_FILE))
}

/// Open a connection to the workspace database. Errors if not initialized.
pub fn open_db() -> Result<Connection, TaskplanError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(TaskplanError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize a workspace in the current directory: create `.taskplan/`,
/// the database, and the schema. Idempotent.
pub fn init_db() -> Result<PathBuf, TaskplanError> {
    let cwd = env::current_dir().map_err(|e| TaskplanError::database(e.to_string()))?;
    let dir = cwd.join(WORKSPACE_DIR);
    fs::create_dir_all(&dir).map_err(|e| TaskplanError::database(e.to_string()))?;
    let path = dir.join(DB_FILE);
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskplanError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
