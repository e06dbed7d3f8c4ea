use serde_json::json;

use crate::cli::commands::ProjectCommands;
use crate::db::{connection, project_repo, task_repo};
use crate::error::TaskplanError;
use crate::models::{NewTask, ProjectPatch};
use crate::output;

pub fn run(cmd: ProjectCommands, json_output: bool) -> i32 {
    let result = match cmd {
        ProjectCommands::Add {
            name,
            status,
            start,
            target,
            budget,
            from,
        } => run_add(&name, status.as_deref(), start.as_deref(), target.as_deref(), budget, from, json_output),
        ProjectCommands::List => run_list(json_output),
        ProjectCommands::Show { id } => run_show(id, json_output),
        ProjectCommands::Update {
            id,
            name,
            status,
            start,
            target,
            budget,
        } => run_update(id, name, status.as_deref(), start.as_deref(), target.as_deref(), budget, json_output),
        ProjectCommands::Delete { id } => run_delete(id, json_output),
    };
    super::finish(result, json_output)
}

fn run_add(
    name: &str,
    status: Option<&str>,
    start: Option<&str>,
    target: Option<&str>,
    budget: Option<i64>,
    from: Option<i64>,
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let status = status.map(super::parse_project_status).transpose()?;
    let start = super::parse_opt_date(start)?;
    let target = super::parse_opt_date(target)?;

    // Atomic: the project and any seeded tasks land together or not at all.
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<_, TaskplanError> {
        let project = project_repo::create_project(&conn, name, status, start, target, budget)?;

        // Seed tasks from a template project. Each copy goes through the
        // code allocator and creation rules like any other new task.
        let mut seeded = 0;
        if let Some(source_id) = from {
            let source_tasks = task_repo::list_tasks_by_project(&conn, source_id)?;
            if source_tasks.is_empty() {
                let _ = project_repo::get_project(&conn, source_id)?;
            }
            for t in &source_tasks {
                let fields = NewTask {
                    description: t.description.clone(),
                    start_date: t.start_date,
                    due_date: t.due_date,
                    duration_days: t.duration_days,
                    depends_on: t.depends_on.clone(),
                    owner: t.owner.clone(),
                    status: None,
                    priority: Some(t.priority),
                    phase: t.phase.clone(),
                    budget: t.budget,
                    actual_budget: None,
                    approval_required: Some(t.approval_required),
                    approver: t.approver.clone(),
                    completion_percent: None,
                    notes: t.notes.clone(),
                };
                task_repo::create_task(&conn, project.id, &fields)?;
                seeded += 1;
            }
        }
        Ok((project, seeded))
    })();

    let (project, seeded) = match result {
        Ok(pair) => {
            conn.execute_batch("COMMIT")?;
            pair
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project),
                "seeded_tasks": seeded
            })))
            .unwrap()
        );
    } else {
        println!("Added project: {} (#{})", project.name, project.id);
        if seeded > 0 {
            println!("Seeded {seeded} task(s).");
        }
    }
    Ok(0)
}

fn run_list(json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let projects = project_repo::list_projects(&conn)?;

    if json_output {
        let list: Vec<_> = projects.iter().map(output::json::project_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "projects": list })))
                .unwrap()
        );
    } else {
        output::text::print_project_list(&projects);
    }
    Ok(0)
}

fn run_show(id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let project = project_repo::get_project(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project)
            })))
            .unwrap()
        );
    } else {
        output::text::print_project(&project);
    }
    Ok(0)
}

fn run_update(
    id: i64,
    name: Option<String>,
    status: Option<&str>,
    start: Option<&str>,
    target: Option<&str>,
    budget: Option<i64>,
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let patch = ProjectPatch {
        name,
        status: status.map(super::parse_project_status).transpose()?,
        start_date: super::parse_opt_date(start)?,
        target_date: super::parse_opt_date(target)?,
        budget,
    };
    let project = project_repo::update_project(&conn, id, &patch)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project)
            })))
            .unwrap()
        );
    } else {
        println!("Updated project #{id}");
    }
    Ok(0)
}

fn run_delete(id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    project_repo::delete_project(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "deleted": id }))).unwrap()
        );
    } else {
        println!("Deleted project #{id} and its tasks");
    }
    Ok(0)
}
