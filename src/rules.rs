use crate::error::TaskplanError;
use crate::models::{parse_dependency_codes, NewTask, Task, TaskPatch, TaskStatus};

/// Creation-time validation. The code has already been allocated so the
/// self-dependency check can see it.
pub fn validate_new_task(code: &str, fields: &NewTask) -> Result<(), TaskplanError> {
    if fields.description.trim().is_empty() {
        return Err(TaskplanError::validation("Task description is required"));
    }
    if let (Some(start), Some(due)) = (fields.start_date, fields.due_date) {
        if due < start {
            return Err(TaskplanError::validation(format!(
                "Due date {due} is before start date {start}"
            )));
        }
    }
    if let Some(d) = fields.duration_days {
        if d < 0 {
            return Err(TaskplanError::validation(format!(
                "Duration must be a non-negative number of days, got {d}"
            )));
        }
    }
    if let Some(p) = fields.completion_percent {
        if !(0..=100).contains(&p) {
            return Err(TaskplanError::percent_out_of_range(p));
        }
    }
    check_self_dependency(code, fields.depends_on.as_deref())?;
    Ok(())
}

/// Update-time guard. Dates are only validated against each other at
/// creation; an update touching one of the two dates is not re-checked.
pub fn check_patch(current: &Task, patch: &TaskPatch) -> Result<(), TaskplanError> {
    if current.status == TaskStatus::Complete {
        if let Some(status) = patch.status {
            if status != TaskStatus::Complete {
                return Err(TaskplanError::cannot_move_back(&current.code));
            }
        }
    }
    if let Some(p) = patch.completion_percent {
        if !(0..=100).contains(&p) {
            return Err(TaskplanError::percent_out_of_range(p));
        }
    }
    if let Some(d) = patch.duration_days {
        if d < 0 {
            return Err(TaskplanError::validation(format!(
                "Duration must be a non-negative number of days, got {d}"
            )));
        }
    }
    check_self_dependency(&current.code, patch.depends_on.as_deref())?;
    Ok(())
}

/// Derived mutation applied before any patch reaches storage: moving a task
/// to complete forces its completion percent to 100, whatever the patch says.
pub fn normalize_patch(mut patch: TaskPatch) -> TaskPatch {
    if patch.status == Some(TaskStatus::Complete) {
        patch.completion_percent = Some(100);
    }
    patch
}

fn check_self_dependency(code: &str, depends_on: Option<&str>) -> Result<(), TaskplanError> {
    let own = code.to_uppercase();
    if parse_dependency_codes(depends_on).contains(&own) {
        return Err(TaskplanError::validation(format!(
            "Task {code} cannot depend on itself"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::Approval;
    use crate::models::Priority;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: 1,
            project_id: 1,
            code: "T001".into(),
            description: "Pour foundation".into(),
            start_date: None,
            due_date: None,
            duration_days: None,
            depends_on: None,
            owner: None,
            status,
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
    fn test_empty_description_rejected() {
        let fields = NewTask {
            description: "   ".into(),
            ..Default::default()
        };
        let err = validate_new_task("T001", &fields).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_due_before_start_rejected_at_creation() {
        let fields = NewTask {
            description: "Frame walls".into(),
            start_date: Some("2026-03-10".parse().unwrap()),
            due_date: Some("2026-03-05".parse().unwrap()),
            ..Default::default()
        };
        assert!(validate_new_task("T001", &fields).is_err());
    }

    #[test]
    fn test_self_dependency_rejected_at_creation() {
        let fields = NewTask {
            description: "Frame walls".into(),
            depends_on: Some("T002, t003".into()),
            ..Default::default()
        };
        assert!(validate_new_task("T003", &fields).is_err());
        assert!(validate_new_task("T004", &fields).is_ok());
    }

    #[test]
    fn test_complete_cannot_move_back() {
        let current = task(TaskStatus::Complete);
        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let err = check_patch(&current, &patch).unwrap_err();
        assert_eq!(err.code, ErrorCode::StateTransitionError);
    }

    #[test]
    fn test_complete_to_complete_is_noop() {
        let current = task(TaskStatus::Complete);
        let patch = TaskPatch {
            status: Some(TaskStatus::Complete),
            ..Default::default()
        };
        assert!(check_patch(&current, &patch).is_ok());
    }

    #[test]
    fn test_other_transitions_free() {
        for from in [TaskStatus::NotStarted, TaskStatus::InProgress, TaskStatus::OnHold] {
            for to in [TaskStatus::NotStarted, TaskStatus::InProgress, TaskStatus::OnHold] {
                let patch = TaskPatch {
                    status: Some(to),
                    ..Default::default()
                };
                assert!(check_patch(&task(from), &patch).is_ok());
            }
        }
    }

    #[test]
    fn test_percent_bounds() {
        let current = task(TaskStatus::InProgress);
        for (value, ok) in [(0, true), (100, true), (101, false), (-1, false)] {
            let patch = TaskPatch {
                completion_percent: Some(value),
                ..Default::default()
            };
            assert_eq!(check_patch(&current, &patch).is_ok(), ok, "percent {value}");
        }
    }

    #[test]
    fn test_normalize_forces_percent_on_complete() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Complete),
            completion_percent: Some(40),
            ..Default::default()
        };
        assert_eq!(normalize_patch(patch).completion_percent, Some(100));
    }

    #[test]
    fn test_normalize_leaves_other_patches_alone() {
        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            completion_percent: Some(40),
            ..Default::default()
        };
        assert_eq!(normalize_patch(patch).completion_percent, Some(40));
    }
}
