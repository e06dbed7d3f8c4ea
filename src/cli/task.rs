use std::collections::HashSet;

use serde_json::json;

use crate::cli::commands::{TaskCommands, TaskFieldArgs};
use crate::db::{connection, task_repo};
use crate::error::TaskplanError;
use crate::models::{NewTask, TaskPatch};
use crate::output;
use crate::schedule::group_by_phase;

pub fn run(cmd: TaskCommands, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            description,
            project,
            fields,
        } => run_add(&description, project, &fields, json_output),
        TaskCommands::List { project } => run_list(project, json_output),
        TaskCommands::Show { id } => run_show(id, json_output),
        TaskCommands::Update {
            id,
            description,
            fields,
        } => run_update(id, description, &fields, json_output),
        TaskCommands::Delete { id } => run_delete(id, json_output),
        TaskCommands::Bulk {
            project,
            ids,
            fields,
        } => run_bulk(project, &ids, &fields, json_output),
    };
    super::finish(result, json_output)
}

fn fields_to_patch(fields: &TaskFieldArgs) -> Result<TaskPatch, TaskplanError> {
    Ok(TaskPatch {
        description: None,
        start_date: super::parse_opt_date(fields.start.as_deref())?,
        due_date: super::parse_opt_date(fields.due.as_deref())?,
        duration_days: fields.duration,
        depends_on: fields.after.clone(),
        owner: fields.owner.clone(),
        status: fields.status.as_deref().map(super::parse_task_status).transpose()?,
        priority: fields.priority.as_deref().map(super::parse_priority).transpose()?,
        phase: fields.phase.clone(),
        budget: fields.budget,
        actual_budget: fields.actual_budget,
        approval_required: fields.approval.as_deref().map(super::parse_approval).transpose()?,
        approver: fields.approver.clone(),
        completion_percent: fields.percent,
        notes: fields.notes.clone(),
    })
}

fn run_add(
    description: &str,
    project_id: i64,
    fields: &TaskFieldArgs,
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let patch = fields_to_patch(fields)?;
    let new_task = NewTask {
        description: description.to_string(),
        start_date: patch.start_date,
        due_date: patch.due_date,
        duration_days: patch.duration_days,
        depends_on: patch.depends_on,
        owner: patch.owner,
        status: patch.status,
        priority: patch.priority,
        phase: patch.phase,
        budget: patch.budget,
        actual_budget: patch.actual_budget,
        approval_required: patch.approval_required,
        approver: patch.approver,
        completion_percent: patch.completion_percent,
        notes: patch.notes,
    };
    let task = task_repo::create_task(&conn, project_id, &new_task)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Added task {} (#{})", task.code, task.id);
    }
    Ok(0)
}

fn run_list(project_id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let _ = crate::db::project_repo::get_project(&conn, project_id)?;
    let tasks = task_repo::list_tasks_by_project(&conn, project_id)?;
    let groups = group_by_phase(&tasks);

    if json_output {
        let phases: Vec<_> = groups.iter().map(output::json::phase_group_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task_count": tasks.len(),
                "phases": phases
            })))
            .unwrap()
        );
    } else {
        output::text::print_grouped_tasks(&groups);
    }
    Ok(0)
}

fn run_show(id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let task = task_repo::get_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

fn run_update(
    id: i64,
    description: Option<String>,
    fields: &TaskFieldArgs,
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let mut patch = fields_to_patch(fields)?;
    patch.description = description;
    let task = task_repo::update_task(&conn, id, &patch)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Updated task {} (#{})", task.code, task.id);
    }
    Ok(0)
}

fn run_delete(id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    task_repo::delete_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "deleted": id }))).unwrap()
        );
    } else {
        println!("Deleted task #{id}");
    }
    Ok(0)
}

fn run_bulk(
    project_id: i64,
    ids: &[i64],
    fields: &TaskFieldArgs,
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let patch = fields_to_patch(fields)?;
    let id_set: HashSet<i64> = ids.iter().copied().collect();
    let updated = task_repo::bulk_update(&conn, project_id, &id_set, &patch)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "updated_count": updated
            })))
            .unwrap()
        );
    } else {
        println!("Updated {updated} of {} task(s)", ids.len());
    }
    Ok(0)
}
