use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::codes::code_number;
use crate::models::{Project, Task};
use crate::schedule::phase::{group_by_phase, mean_completion};

/// Fixed palette cycled over phase rows, indexed by phase position.
const PHASE_PALETTE: [&str; 8] = [
    "#2563eb", "#16a34a", "#d97706", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
];

/// How far before today the initial viewport sits, so current work is
/// visible without scrolling.
const VIEWPORT_LOOKBACK_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Project,
    Phase,
    Task,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Phase => "phase",
            Self::Task => "task",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineScope {
    All,
    Project(i64),
}

/// One renderable row. `end` is exclusive, so a one-day task spans
/// `[start, start + 1)`.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineRow {
    pub id: String,
    pub parent: Option<String>,
    pub kind: RowKind,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub depends_on: Vec<String>,
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub rows: Vec<TimelineRow>,
    /// Project id → index of that project's row in `rows`.
    pub drilldown: HashMap<i64, usize>,
    /// Number of tasks whose span was computed from partial information
    /// rather than taken from stored dates.
    pub inferred_count: usize,
    pub viewport_date: NaiveDate,
}

/// Derive the hierarchical timeline (project → phase → task rows) for the
/// selected projects. Pure over its inputs: `today` is passed in so repeated
/// calls with unchanged input produce identical output.
pub fn build_timeline(
    projects: &[Project],
    tasks: &[Task],
    scope: TimelineScope,
    critical_ids: &HashSet<i64>,
    today: NaiveDate,
) -> Timeline {
    let mut rows: Vec<TimelineRow> = Vec::new();
    let mut drilldown = HashMap::new();
    let mut inferred_count = 0;

    for project in projects {
        if let TimelineScope::Project(id) = scope {
            if project.id != id {
                continue;
            }
        }

        let mut own: Vec<&Task> = tasks.iter().filter(|t| t.project_id == project.id).collect();
        own.sort_by_key(|t| task_sort_key(t));

        let fallback_start = project
            .start_date
            .or_else(|| own.iter().filter_map(|t| t.start_date).min())
            .unwrap_or(today);

        // Spans resolve in ascending task-code order so the rolling cursor
        // chains undated tasks one after another.
        let mut spans: HashMap<i64, (NaiveDate, NaiveDate)> = HashMap::new();
        let mut cursor = fallback_start;
        for task in &own {
            let (start, end, inferred) = resolve_span(task, cursor);
            if inferred {
                inferred_count += 1;
            }
            cursor = end + Duration::days(1);
            spans.insert(task.id, (start, end));
        }

        let code_to_row: HashMap<String, String> = own
            .iter()
            .map(|t| (t.code.to_uppercase(), task_row_id(t.id)))
            .collect();

        let (project_start, project_end) = if own.is_empty() {
            let start = project.start_date.unwrap_or(today);
            let end = match project.target_date {
                Some(d) if d > start => d,
                _ => start + Duration::days(1),
            };
            (start, end)
        } else {
            let start = own.iter().map(|t| spans[&t.id].0).min().unwrap();
            let end = own.iter().map(|t| spans[&t.id].1).max().unwrap();
            (start, end)
        };

        let member_tasks: Vec<Task> = own.iter().map(|t| (*t).clone()).collect();
        let project_row_id = format!("project-{}", project.id);

        drilldown.insert(project.id, rows.len());
        rows.push(TimelineRow {
            id: project_row_id.clone(),
            parent: None,
            kind: RowKind::Project,
            label: project.name.clone(),
            start: project_start,
            end: project_end,
            progress: mean_completion(&member_tasks),
            color: None,
            depends_on: Vec::new(),
            critical: own.iter().any(|t| critical_ids.contains(&t.id)),
        });

        for (idx, group) in group_by_phase(&member_tasks).iter().enumerate() {
            let phase_row_id = format!("phase-{}-{}", project.id, idx);
            let (phase_start, phase_end) = phase_span(group.start_date, group.end_date, fallback_start);
            let group_critical = group.tasks.iter().any(|t| critical_ids.contains(&t.id));

            rows.push(TimelineRow {
                id: phase_row_id.clone(),
                parent: Some(project_row_id.clone()),
                kind: RowKind::Phase,
                label: group.name.clone(),
                start: phase_start,
                end: phase_end,
                progress: group.progress,
                color: Some(PHASE_PALETTE[idx % PHASE_PALETTE.len()].to_string()),
                depends_on: Vec::new(),
                critical: group_critical,
            });

            for task in &group.tasks {
                let (start, end) = spans[&task.id];
                // Unresolvable codes are dropped here; the dependency
                // validator is where they get reported.
                let edges: Vec<String> = task
                    .dependency_codes()
                    .into_iter()
                    .filter_map(|c| code_to_row.get(&c).cloned())
                    .collect();

                rows.push(TimelineRow {
                    id: task_row_id(task.id),
                    parent: Some(phase_row_id.clone()),
                    kind: RowKind::Task,
                    label: format!("{} {}", task.code, task.description),
                    start,
                    end,
                    progress: task.completion_percent,
                    color: None,
                    depends_on: edges,
                    critical: critical_ids.contains(&task.id),
                });
            }
        }
    }

    let viewport_date = if rows.is_empty() {
        today
    } else {
        today - Duration::days(VIEWPORT_LOOKBACK_DAYS)
    };

    Timeline {
        rows,
        drilldown,
        inferred_count,
        viewport_date,
    }
}

fn task_row_id(task_id: i64) -> String {
    format!("task-{task_id}")
}

fn task_sort_key(task: &Task) -> (u64, String) {
    (code_number(&task.code).unwrap_or(u64::MAX), task.code.clone())
}

/// Resolve a task's `[start, end)` span. Precedence: both dates verbatim
/// (pushing due to start + 1 when due ≤ start, which does not count as
/// inferred); start plus duration; due minus duration; rolling cursor plus
/// duration. Duration defaults to one day when unset or negative.
fn resolve_span(task: &Task, cursor: NaiveDate) -> (NaiveDate, NaiveDate, bool) {
    let duration = task.duration_days.filter(|d| *d >= 0).unwrap_or(1);
    match (task.start_date, task.due_date) {
        (Some(start), Some(due)) => {
            let end = if due <= start { start + Duration::days(1) } else { due };
            (start, end, false)
        }
        (Some(start), None) => (start, start + Duration::days(duration), true),
        (None, Some(due)) => {
            let start = due - Duration::days(duration);
            let end = if due <= start { start + Duration::days(1) } else { due };
            (start, end, true)
        }
        (None, None) => (cursor, cursor + Duration::days(duration), true),
    }
}

fn phase_span(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fallback_start: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match (start, end) {
        (Some(s), Some(e)) if e > s => (s, e),
        (Some(s), _) => (s, s + Duration::days(1)),
        (None, Some(e)) => (e - Duration::days(1), e),
        (None, None) => (fallback_start, fallback_start + Duration::days(1)),
    }
}
