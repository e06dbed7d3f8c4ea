use std::collections::HashSet;

use rusqlite::{params, Connection, ToSql};

use crate::codes;
use crate::error::TaskplanError;
use crate::models::{Approval, NewTask, Priority, Task, TaskPatch, TaskStatus};
use crate::rules;

use super::{date_from_sql, date_to_sql, project_repo, push_set};

const TASK_COLUMNS: &str = "id, project_id, code, description, start_date, due_date, \
     duration_days, depends_on, owner, status, priority, phase, budget, actual_budget, \
     approval_required, approver, completion_percent, notes, created_at, updated_at";

/// Create a task: allocate the next code for the project, run the creation
/// rules, insert.
pub fn create_task(
    conn: &Connection,
    project_id: i64,
    fields: &NewTask,
) -> Result<Task, TaskplanError> {
    let _ = project_repo::get_project(conn, project_id)?;
    let existing = list_codes(conn, project_id)?;
    let code = codes::next_task_code(&existing);
    rules::validate_new_task(&code, fields)?;

    conn.execute(
        "INSERT INTO tasks (project_id, code, description, start_date, due_date,
             duration_days, depends_on, owner, status, priority, phase, budget,
             actual_budget, approval_required, approver, completion_percent, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            project_id,
            code,
            fields.description.trim(),
            date_to_sql(fields.start_date),
            date_to_sql(fields.due_date),
            fields.duration_days,
            fields.depends_on,
            fields.owner,
            fields.status.unwrap_or(TaskStatus::NotStarted).as_str(),
            fields.priority.unwrap_or(Priority::Medium).as_str(),
            fields.phase,
            fields.budget,
            fields.actual_budget,
            fields.approval_required.unwrap_or(Approval::No).as_str(),
            fields.approver,
            fields.completion_percent.unwrap_or(0),
            fields.notes,
        ],
    )?;
    get_task(conn, conn.last_insert_rowid())
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task, TaskplanError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskplanError::task_not_found(id),
        _ => TaskplanError::from(e),
    })
}

pub fn list_tasks_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>, TaskplanError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1
         ORDER BY CAST(substr(code, 2) AS INTEGER) ASC, code ASC"
    ))?;
    let tasks = stmt
        .query_map(params![project_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_all_tasks(conn: &Connection) -> Result<Vec<Task>, TaskplanError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         ORDER BY project_id ASC, CAST(substr(code, 2) AS INTEGER) ASC, code ASC"
    ))?;
    let tasks = stmt.query_map([], row_to_task)?.collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_codes(conn: &Connection, project_id: i64) -> Result<Vec<String>, TaskplanError> {
    let mut stmt = conn.prepare("SELECT code FROM tasks WHERE project_id = ?1")?;
    let codes = stmt
        .query_map(params![project_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(codes)
}

/// Update a single task through the lifecycle guard and patch normalization.
pub fn update_task(conn: &Connection, id: i64, patch: &TaskPatch) -> Result<Task, TaskplanError> {
    let current = get_task(conn, id)?;
    rules::check_patch(&current, patch)?;
    let patch = rules::normalize_patch(patch.clone());
    apply_patch(conn, id, None, &patch)?;
    get_task(conn, id)
}

/// Apply one patch to every selected task that belongs to the project.
///
/// The patch is normalized once (status complete forces 100%) and bounds are
/// validated once up front. Ids outside the project, unknown ids, and tasks
/// the lifecycle guard would reject are skipped, not errors: the returned
/// count says how many tasks actually changed, which is how a caller detects
/// partial application. Runs inside a single transaction.
pub fn bulk_update(
    conn: &Connection,
    project_id: i64,
    task_ids: &HashSet<i64>,
    patch: &TaskPatch,
) -> Result<usize, TaskplanError> {
    let _ = project_repo::get_project(conn, project_id)?;
    if let Some(p) = patch.completion_percent {
        if !(0..=100).contains(&p) {
            return Err(TaskplanError::percent_out_of_range(p));
        }
    }
    let patch = rules::normalize_patch(patch.clone());

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<usize, TaskplanError> {
        let mut updated = 0;
        for &id in task_ids {
            let Ok(current) = get_task(conn, id) else {
                continue;
            };
            if current.project_id != project_id {
                continue;
            }
            if rules::check_patch(&current, &patch).is_err() {
                continue;
            }
            updated += apply_patch(conn, id, Some(project_id), &patch)?;
        }
        Ok(updated)
    })();

    match result {
        Ok(count) => {
            conn.execute_batch("COMMIT")?;
            Ok(count)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<(), TaskplanError> {
    let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(TaskplanError::task_not_found(id));
    }
    Ok(())
}

/// Write the present fields of a patch. With `project_id` given, the row must
/// also belong to that project to match. Returns affected row count (0 or 1).
fn apply_patch(
    conn: &Connection,
    id: i64,
    project_id: Option<i64>,
    patch: &TaskPatch,
) -> Result<usize, TaskplanError> {
    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(d) = &patch.description {
        if d.trim().is_empty() {
            return Err(TaskplanError::validation("Task description is required"));
        }
        push_set(&mut sets, &mut values, "description", Box::new(d.trim().to_string()));
    }
    if let Some(d) = patch.start_date {
        push_set(&mut sets, &mut values, "start_date", Box::new(date_to_sql(Some(d))));
    }
    if let Some(d) = patch.due_date {
        push_set(&mut sets, &mut values, "due_date", Box::new(date_to_sql(Some(d))));
    }
    if let Some(d) = patch.duration_days {
        push_set(&mut sets, &mut values, "duration_days", Box::new(d));
    }
    if let Some(deps) = &patch.depends_on {
        push_set(&mut sets, &mut values, "depends_on", Box::new(deps.clone()));
    }
    if let Some(owner) = &patch.owner {
        push_set(&mut sets, &mut values, "owner", Box::new(owner.clone()));
    }
    if let Some(status) = patch.status {
        push_set(&mut sets, &mut values, "status", Box::new(status.as_str()));
    }
    if let Some(priority) = patch.priority {
        push_set(&mut sets, &mut values, "priority", Box::new(priority.as_str()));
    }
    if let Some(phase) = &patch.phase {
        push_set(&mut sets, &mut values, "phase", Box::new(phase.clone()));
    }
    if let Some(b) = patch.budget {
        push_set(&mut sets, &mut values, "budget", Box::new(b));
    }
    if let Some(b) = patch.actual_budget {
        push_set(&mut sets, &mut values, "actual_budget", Box::new(b));
    }
    if let Some(a) = patch.approval_required {
        push_set(&mut sets, &mut values, "approval_required", Box::new(a.as_str()));
    }
    if let Some(a) = &patch.approver {
        push_set(&mut sets, &mut values, "approver", Box::new(a.clone()));
    }
    if let Some(p) = patch.completion_percent {
        push_set(&mut sets, &mut values, "completion_percent", Box::new(p));
    }
    if let Some(n) = &patch.notes {
        push_set(&mut sets, &mut values, "notes", Box::new(n.clone()));
    }

    if sets.is_empty() {
        return Ok(0);
    }
    sets.push("updated_at = datetime('now')".to_string());

    values.push(Box::new(id));
    let mut sql = format!(
        "UPDATE tasks SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );
    if let Some(pid) = project_id {
        values.push(Box::new(pid));
        sql.push_str(&format!(" AND project_id = ?{}", values.len()));
    }

    let affected = conn.execute(&sql, rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())))?;
    Ok(affected)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        code: row.get(2)?,
        description: row.get(3)?,
        start_date: date_from_sql(row.get(4)?),
        due_date: date_from_sql(row.get(5)?),
        duration_days: row.get(6)?,
        depends_on: row.get(7)?,
        owner: row.get(8)?,
        status: TaskStatus::from_str(&row.get::<_, String>(9)?).unwrap_or(TaskStatus::NotStarted),
        priority: Priority::from_str(&row.get::<_, String>(10)?).unwrap_or(Priority::Medium),
        phase: row.get(11)?,
        budget: row.get(12)?,
        actual_budget: row.get(13)?,
        approval_required: Approval::from_str(&row.get::<_, String>(14)?).unwrap_or(Approval::No),
        approver: row.get(15)?,
        completion_percent: row.get(16)?,
        notes: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}
