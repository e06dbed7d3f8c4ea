pub mod commands;
pub mod init;
pub mod project;
pub mod status;
pub mod task;
pub mod timeline;
pub mod validate;

pub use commands::*;

use chrono::NaiveDate;

use crate::error::TaskplanError;
use crate::models::{Approval, Priority, ProjectStatus, TaskStatus};

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, TaskplanError> {
    s.parse()
        .map_err(|_| TaskplanError::validation(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}

pub(crate) fn parse_opt_date(s: Option<&str>) -> Result<Option<NaiveDate>, TaskplanError> {
    s.map(parse_date).transpose()
}

pub(crate) fn parse_project_status(s: &str) -> Result<ProjectStatus, TaskplanError> {
    ProjectStatus::from_str(s).ok_or_else(|| {
        TaskplanError::validation(format!(
            "Invalid project status '{s}', expected planning|active|on_hold|closeout|complete"
        ))
    })
}

pub(crate) fn parse_task_status(s: &str) -> Result<TaskStatus, TaskplanError> {
    TaskStatus::from_str(s).ok_or_else(|| {
        TaskplanError::validation(format!(
            "Invalid task status '{s}', expected not_started|in_progress|complete|on_hold"
        ))
    })
}

pub(crate) fn parse_priority(s: &str) -> Result<Priority, TaskplanError> {
    Priority::from_str(s).ok_or_else(|| {
        TaskplanError::validation(format!("Invalid priority '{s}', expected high|medium|low"))
    })
}

pub(crate) fn parse_approval(s: &str) -> Result<Approval, TaskplanError> {
    Approval::from_str(s).ok_or_else(|| {
        TaskplanError::validation(format!("Invalid approval value '{s}', expected yes|no"))
    })
}

/// Shared tail of every command: print the error envelope on failure.
pub(crate) fn finish(result: Result<i32, TaskplanError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&crate::output::json::error(&e)).unwrap()
                );
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
