use rusqlite::Connection;

use crate::error::TaskplanError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskplanError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'planning'
                CHECK (status IN ('planning', 'active', 'on_hold', 'closeout', 'complete')),
            start_date TEXT,
            target_date TEXT,
            budget INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            code TEXT NOT NULL,
            description TEXT NOT NULL,
            start_date TEXT,
            due_date TEXT,
            duration_days INTEGER,
            depends_on TEXT,
            owner TEXT,
            status TEXT NOT NULL DEFAULT 'not_started'
                CHECK (status IN ('not_started', 'in_progress', 'complete', 'on_hold')),
            priority TEXT NOT NULL DEFAULT 'medium'
                CHECK (priority IN ('high', 'medium', 'low')),
            phase TEXT,
            budget INTEGER,
            actual_budget INTEGER,
            approval_required TEXT NOT NULL DEFAULT 'no'
                CHECK (approval_required IN ('yes', 'no')),
            approver TEXT,
            completion_percent INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (project_id, code)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_project_status ON tasks(project_id, status);
        ",
    )?;
    Ok(())
}
