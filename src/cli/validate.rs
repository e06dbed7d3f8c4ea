use serde_json::json;

use crate::db::{connection, project_repo, task_repo};
use crate::error::TaskplanError;
use crate::graph::validate_dependencies;
use crate::output;

pub fn run(project_id: i64, json_output: bool) -> i32 {
    super::finish(run_validate(project_id, json_output), json_output)
}

fn run_validate(project_id: i64, json_output: bool) -> Result<i32, TaskplanError> {
    let conn = connection::open_db()?;
    let _ = project_repo::get_project(&conn, project_id)?;
    let tasks = task_repo::list_tasks_by_project(&conn, project_id)?;
    let issues = validate_dependencies(&tasks);

    if json_output {
        let list: Vec<_> = issues.iter().map(output::json::issue_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "issue_count": issues.len(),
                "issues": list
            })))
            .unwrap()
        );
    } else {
        output::text::print_issues(&issues);
    }
    Ok(0)
}
