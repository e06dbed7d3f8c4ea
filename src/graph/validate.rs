use std::collections::HashMap;

use serde::Serialize;

use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingDependency,
    DateConflict,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingDependency => "missing_dependency",
            Self::DateConflict => "date_conflict",
        }
    }
}

/// A reported dependency problem. Issues are advisory: the graph is allowed
/// to be transiently inconsistent mid-edit, so nothing here blocks a write.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub task_code: String,
    pub dependency_code: String,
    pub detail: String,
}

/// Check every task's dependency list against its siblings.
///
/// Emits `missing_dependency` for a code with no matching sibling and
/// `date_conflict` when a dependency is scheduled to finish after its
/// dependent starts (both dates present). Self-references are rejected at the
/// editing boundary and do not reappear here.
pub fn validate_dependencies(tasks: &[Task]) -> Vec<Issue> {
    let by_code: HashMap<String, &Task> = tasks
        .iter()
        .map(|t| (t.code.to_uppercase(), t))
        .collect();

    let mut issues = Vec::new();
    for task in tasks {
        for dep_code in task.dependency_codes() {
            let Some(dep) = by_code.get(&dep_code) else {
                issues.push(Issue {
                    kind: IssueKind::MissingDependency,
                    task_code: task.code.clone(),
                    dependency_code: dep_code.clone(),
                    detail: format!("Task {} depends on {dep_code}, which does not exist", task.code),
                });
                continue;
            };
            if let (Some(dep_due), Some(start)) = (dep.due_date, task.start_date) {
                if dep_due > start {
                    issues.push(Issue {
                        kind: IssueKind::DateConflict,
                        task_code: task.code.clone(),
                        dependency_code: dep_code.clone(),
                        detail: format!(
                            "Task {} starts {start} but its dependency {dep_code} is not due until {dep_due}",
                            task.code
                        ),
                    });
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Approval, Priority, TaskStatus};
    use chrono::NaiveDate;

    fn task(code: &str, start: Option<&str>, due: Option<&str>, depends_on: Option<&str>) -> Task {
        Task {
            id: 0,
            project_id: 1,
            code: code.into(),
            description: format!("task {code}"),
            start_date: start.map(|s| s.parse::<NaiveDate>().unwrap()),
            due_date: due.map(|s| s.parse::<NaiveDate>().unwrap()),
            duration_days: None,
            depends_on: depends_on.map(Into::into),
            owner: None,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            phase: None,
            budget: None,
            actual_budget: None,
            approval_required: Approval::No,
            approver: None,
            completion_percent: 0,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_clean_graph() {
        let tasks = vec![
            task("T001", None, Some("2026-01-05"), None),
            task("T002", Some("2026-01-06"), None, Some("T001")),
        ];
        assert!(validate_dependencies(&tasks).is_empty());
    }

    #[test]
    fn test_missing_dependency() {
        let tasks = vec![task("T001", None, None, Some("T404"))];
        let issues = validate_dependencies(&tasks);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingDependency);
        assert_eq!(issues[0].task_code, "T001");
        assert_eq!(issues[0].dependency_code, "T404");
    }

    #[test]
    fn test_date_conflict() {
        let tasks = vec![
            task("T100", None, Some("2026-01-10"), None),
            task("T101", Some("2026-01-05"), None, Some("T100")),
        ];
        let issues = validate_dependencies(&tasks);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DateConflict);
        assert_eq!(issues[0].task_code, "T101");
        assert_eq!(issues[0].dependency_code, "T100");
    }

    #[test]
    fn test_dependency_due_on_start_day_is_not_a_conflict() {
        let tasks = vec![
            task("T100", None, Some("2026-01-05"), None),
            task("T101", Some("2026-01-05"), None, Some("T100")),
        ];
        assert!(validate_dependencies(&tasks).is_empty());
    }

    #[test]
    fn test_missing_dates_are_not_conflicts() {
        let tasks = vec![
            task("T100", None, None, None),
            task("T101", Some("2026-01-05"), None, Some("T100")),
        ];
        assert!(validate_dependencies(&tasks).is_empty());
    }

    #[test]
    fn test_codes_match_case_insensitively() {
        let tasks = vec![
            task("T001", None, None, None),
            task("T002", None, None, Some(" t001 ")),
        ];
        assert!(validate_dependencies(&tasks).is_empty());
    }

    #[test]
    fn test_multiple_tokens_each_checked() {
        let tasks = vec![
            task("T001", None, None, None),
            task("T002", None, None, Some("T001,T404,T405")),
        ];
        let issues = validate_dependencies(&tasks);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::MissingDependency));
    }
}
