use serde_json::json;

use crate::db::{connection, project_repo, task_repo};
use crate::error::TaskplanError;
use crate::models::TaskStatus;
use crate::output;
use crate::schedule::{group_by_phase, mean_completion};

pub fn run(project_id: i64, json_output: bool) -> i32 {
    super::finish(run_status(project_id, json_output), json_output)
}

fn run_status(project_id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let project = project_repo::get_project(&conn, project_id)?;
    let tasks = task_repo::list_tasks_by_project(&conn, project_id)?;
    let groups = group_by_phase(&tasks);

    let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
    let not_started = count(TaskStatus::NotStarted);
    let in_progress = count(TaskStatus::InProgress);
    let complete = count(TaskStatus::Complete);
    let on_hold = count(TaskStatus::OnHold);
    let percent = mean_completion(&tasks);

    if json_output {
        let phases: Vec<_> = groups
            .iter()
            .map(|g| {
                json!({
                    "name": g.name,
                    "progress": g.progress,
                    "start_date": g.start_date,
                    "end_date": g.end_date,
                    "task_count": g.tasks.len()
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project),
                "totals": {
                    "total": tasks.len(),
                    "not_started": not_started,
                    "in_progress": in_progress,
                    "complete": complete,
                    "on_hold": on_hold,
                    "percent_complete": percent
                },
                "phases": phases
            })))
            .unwrap()
        );
    } else {
        output::text::print_project(&project);
        println!(
            "Progress: {percent}% ({complete}/{} complete)",
            tasks.len()
        );
        println!(
            "  not_started={not_started} in_progress={in_progress} complete={complete} on_hold={on_hold}"
        );
        for g in &groups {
            println!("  {} — {}% ({} task(s))", g.name, g.progress, g.tasks.len());
        }
    }
    Ok(0)
}
