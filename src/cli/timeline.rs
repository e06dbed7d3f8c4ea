use std::collections::HashSet;

use serde_json::json;

use crate::db::{connection, project_repo, task_repo};
use crate::error::TaskplanError;
use crate::output;
use crate::schedule::{build_timeline, TimelineScope};

pub fn run(project_id: Option<i64>, critical: &[i64], json_output: bool) -> i32 {
    super::finish(run_timeline(project_id, critical, json_output), json_output)
}

fn run_timeline(
    project_id: Option<i64>,
    critical: &[i64],
    json_output: bool,
) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    if let Some(id) = project_id {
        let _ = project_repo::get_project(&conn, id)?;
    }
    let projects = project_repo::list_projects(&conn)?;
    let tasks = task_repo::list_all_tasks(&conn)?;
    let scope = match project_id {
        Some(id) => TimelineScope::Project(id),
        None => TimelineScope::All,
    };
    let critical_ids: HashSet<i64> = critical.iter().copied().collect();
    let today = chrono::Local::now().date_naive();

    let timeline = build_timeline(&projects, &tasks, scope, &critical_ids, today);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "timeline": output::json::timeline_json(&timeline)
            })))
            .unwrap()
        );
    } else {
        output::text::print_timeline(&timeline);
    }
    Ok(0)
}
