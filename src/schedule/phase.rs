use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Task;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Sort key for phases without a parseable "Phase N" prefix: after every
/// numbered phase, alphabetical among themselves.
const UNNUMBERED: u64 = u64::MAX;

/// Tasks rolled up under one phase label. Never persisted; re-derived on
/// every read.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGroup {
    pub name: String,
    pub order: u64,
    pub tasks: Vec<Task>,
    /// Mean completion percent of the members, rounded to nearest integer.
    pub progress: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Group tasks by their trimmed phase label ("Uncategorized" when blank),
/// ordered by the "Phase N" numeric-prefix convention.
pub fn group_by_phase(tasks: &[Task]) -> Vec<PhaseGroup> {
    let mut groups: Vec<(String, Vec<Task>)> = Vec::new();
    for task in tasks {
        let name = match task.phase.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => UNCATEGORIZED.to_string(),
        };
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, members)) => members.push(task.clone()),
            None => groups.push((name, vec![task.clone()])),
        }
    }

    let mut groups: Vec<PhaseGroup> = groups
        .into_iter()
        .map(|(name, members)| {
            let order = phase_order(&name).unwrap_or(UNNUMBERED);
            let progress = mean_completion(&members);
            let start_date = members.iter().filter_map(|t| t.start_date).min();
            let end_date = members.iter().filter_map(|t| t.due_date).max();
            PhaseGroup {
                name,
                order,
                tasks: members,
                progress,
                start_date,
                end_date,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    groups
}

/// Numeric prefix of a name matching `Phase <digits>` (case-insensitive,
/// anything may follow the digits).
pub fn phase_order(name: &str) -> Option<u64> {
    let trimmed = name.trim();
    let head = trimmed.get(..5)?;
    if !head.eq_ignore_ascii_case("phase") {
        return None;
    }
    let rest = &trimmed[5..];
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // "PhaseX" without whitespace does not match the convention.
        return None;
    }
    let digits: String = after_ws.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn mean_completion(tasks: &[Task]) -> i64 {
    if tasks.is_empty() {
        return 0;
    }
    let sum: i64 = tasks.iter().map(|t| t.completion_percent).sum();
    (sum as f64 / tasks.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Approval, Priority, TaskStatus};

    fn task(phase: Option<&str>, percent: i64, start: Option<&str>, due: Option<&str>) -> Task {
        Task {
            id: 0,
            project_id: 1,
            code: "T001".into(),
            description: "work".into(),
            start_date: start.map(|s| s.parse().unwrap()),
            due_date: due.map(|s| s.parse().unwrap()),
            duration_days: None,
            depends_on: None,
            owner: None,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            phase: phase.map(Into::into),
            budget: None,
            actual_budget: None,
            approval_required: Approval::No,
            approver: None,
            completion_percent: percent,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_phase_order_parsing() {
        assert_eq!(phase_order("Phase 1: Foundations"), Some(1));
        assert_eq!(phase_order("phase 12"), Some(12));
        assert_eq!(phase_order("  PHASE 3 extras  "), Some(3));
        assert_eq!(phase_order("Phase2"), None);
        assert_eq!(phase_order("Phase x"), None);
        assert_eq!(phase_order("Random"), None);
        assert_eq!(phase_order(""), None);
    }

    #[test]
    fn test_numbered_phases_sort_before_unnumbered() {
        let tasks = vec![
            task(Some("Phase 2: Build"), 0, None, None),
            task(Some("Random"), 0, None, None),
            task(Some("Phase 1: Plan"), 0, None, None),
        ];
        let names: Vec<_> = group_by_phase(&tasks).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Phase 1: Plan", "Phase 2: Build", "Random"]);
    }

    #[test]
    fn test_unnumbered_alphabetical() {
        let tasks = vec![
            task(Some("zeta"), 0, None, None),
            task(Some("Alpha"), 0, None, None),
        ];
        let names: Vec<_> = group_by_phase(&tasks).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Alpha", "zeta"]);
    }

    #[test]
    fn test_blank_phase_goes_to_uncategorized() {
        let tasks = vec![
            task(None, 0, None, None),
            task(Some("   "), 0, None, None),
        ];
        let groups = group_by_phase(&tasks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, UNCATEGORIZED);
        assert_eq!(groups[0].tasks.len(), 2);
    }

    #[test]
    fn test_progress_is_rounded_mean() {
        let tasks = vec![
            task(Some("Phase 1: Plan"), 50, None, None),
            task(Some("Phase 1: Plan"), 25, None, None),
        ];
        let groups = group_by_phase(&tasks);
        assert_eq!(groups[0].progress, 38); // 37.5 rounds up
    }

    #[test]
    fn test_date_span_ignores_missing() {
        let tasks = vec![
            task(Some("Phase 1: Plan"), 0, Some("2026-02-03"), None),
            task(Some("Phase 1: Plan"), 0, Some("2026-02-01"), Some("2026-02-10")),
            task(Some("Phase 1: Plan"), 0, None, Some("2026-02-08")),
        ];
        let groups = group_by_phase(&tasks);
        assert_eq!(groups[0].start_date, Some("2026-02-01".parse().unwrap()));
        assert_eq!(groups[0].end_date, Some("2026-02-10".parse().unwrap()));
    }

    #[test]
    fn test_no_dates_yields_none() {
        let tasks = vec![task(Some("Phase 1: Plan"), 0, None, None)];
        let groups = group_by_phase(&tasks);
        assert_eq!(groups[0].start_date, None);
        assert_eq!(groups[0].end_date, None);
    }
}
