use rusqlite::{params, Connection};

use crate::error::TaskplanError;
use crate::models::{Project, ProjectPatch, ProjectStatus};

use super::{date_from_sql, date_to_sql, push_set};

const PROJECT_COLUMNS: &str =
    "id, name, status, start_date, target_date, budget, created_at, updated_at";

pub fn create_project(
    conn: &Connection,
    name: &str,
    status: Option<ProjectStatus>,
    start_date: Option<chrono::NaiveDate>,
    target_date: Option<chrono::NaiveDate>,
    budget: Option<i64>,
) -> Result<Project, TaskplanError> {
    if name.trim().is_empty() {
        return Err(TaskplanError::validation("Project name is required"));
    }
    conn.execute(
        "INSERT INTO projects (name, status, start_date, target_date, budget)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name.trim(),
            status.unwrap_or(ProjectStatus::Planning).as_str(),
            date_to_sql(start_date),
            date_to_sql(target_date),
            budget,
        ],
    )?;
    get_project(conn, conn.last_insert_rowid())
}

pub fn get_project(conn: &Connection, id: i64) -> Result<Project, TaskplanError> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
        params![id],
        row_to_project,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskplanError::project_not_found(id),
        _ => TaskplanError::from(e),
    })
}

pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, TaskplanError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id ASC"))?;
    let projects = stmt
        .query_map([], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn update_project(
    conn: &Connection,
    id: i64,
    patch: &ProjectPatch,
) -> Result<Project, TaskplanError> {
    let current = get_project(conn, id)?;
    if patch.is_empty() {
        return Ok(current);
    }
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(TaskplanError::validation("Project name is required"));
        }
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(name) = &patch.name {
        push_set(&mut sets, &mut values, "name", Box::new(name.trim().to_string()));
    }
    if let Some(status) = patch.status {
        push_set(&mut sets, &mut values, "status", Box::new(status.as_str()));
    }
    if let Some(d) = patch.start_date {
        push_set(&mut sets, &mut values, "start_date", Box::new(date_to_sql(Some(d))));
    }
    if let Some(d) = patch.target_date {
        push_set(&mut sets, &mut values, "target_date", Box::new(date_to_sql(Some(d))));
    }
    if let Some(b) = patch.budget {
        push_set(&mut sets, &mut values, "budget", Box::new(b));
    }
    sets.push("updated_at = datetime('now')".to_string());

    let sql = format!(
        "UPDATE projects SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len() + 1
    );
    values.push(Box::new(id));
    conn.execute(&sql, rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())))?;
    get_project(conn, id)
}

/// Delete a project. Its tasks go with it (ON DELETE CASCADE).
pub fn delete_project(conn: &Connection, id: i64) -> Result<(), TaskplanError> {
    let affected = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(TaskplanError::project_not_found(id));
    }
    Ok(())
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        status: ProjectStatus::from_str(&row.get::<_, String>(2)?)
            .unwrap_or(ProjectStatus::Planning),
        start_date: date_from_sql(row.get(3)?),
        target_date: date_from_sql(row.get(4)?),
        budget: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
