use chrono::NaiveDate;

use crate::graph::Issue;
use crate::models::{Project, Task};
use crate::schedule::{PhaseGroup, RowKind, Timeline};

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn fmt_money(cents: Option<i64>) -> String {
    match cents {
        Some(c) => format!("{}.{:02}", c / 100, (c % 100).abs()),
        None => "-".into(),
    }
}

pub fn print_project(p: &Project) {
    println!("Project: {} (#{})", p.name, p.id);
    println!("  Status: {}", p.status.as_str());
    println!("  Start: {}", fmt_date(p.start_date));
    println!("  Target: {}", fmt_date(p.target_date));
    println!("  Budget: {}", fmt_money(p.budget));
}

pub fn print_project_list(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    for p in projects {
        println!(
            "  #{} {} [{}] {} → {}",
            p.id,
            p.name,
            p.status.as_str(),
            fmt_date(p.start_date),
            fmt_date(p.target_date)
        );
    }
}

pub fn print_task(t: &Task) {
    println!("Task {} (#{})", t.code, t.id);
    println!("  Description: {}", t.description);
    println!("  Status: {} ({}%)", t.status.as_str(), t.completion_percent);
    println!("  Priority: {}", t.priority.as_str());
    println!("  Start: {}  Due: {}", fmt_date(t.start_date), fmt_date(t.due_date));
    if let Some(d) = t.duration_days {
        println!("  Duration: {d}d");
    }
    if let Some(ref deps) = t.depends_on {
        if !deps.trim().is_empty() {
            println!("  Depends on: {deps}");
        }
    }
    if let Some(ref owner) = t.owner {
        println!("  Owner: {owner}");
    }
    if let Some(ref phase) = t.phase {
        println!("  Phase: {phase}");
    }
    if t.budget.is_some() || t.actual_budget.is_some() {
        println!(
            "  Budget: {} (actual {})",
            fmt_money(t.budget),
            fmt_money(t.actual_budget)
        );
    }
    if let Some(ref approver) = t.approver {
        println!(
            "  Approval: {} ({approver})",
            t.approval_required.as_str()
        );
    }
    if let Some(ref notes) = t.notes {
        println!("  Notes: {notes}");
    }
}

fn print_task_line(t: &Task) {
    let deps = t
        .depends_on
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!(" after {d}"))
        .unwrap_or_default();
    println!(
        "    {} [{}] {} ({}%){}",
        t.code,
        t.status.as_str(),
        t.description,
        t.completion_percent,
        deps
    );
}

/// Tasks grouped under phase headers, in phase order.
pub fn print_grouped_tasks(groups: &[PhaseGroup]) {
    if groups.is_empty() {
        println!("No tasks found.");
        return;
    }
    for g in groups {
        println!(
            "  {} — {}% [{} .. {}]",
            g.name,
            g.progress,
            fmt_date(g.start_date),
            fmt_date(g.end_date)
        );
        for t in &g.tasks {
            print_task_line(t);
        }
    }
}

pub fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("No dependency issues found.");
        return;
    }
    println!("{} issue(s):", issues.len());
    for i in issues {
        println!("  [{}] {}", i.kind.as_str(), i.detail);
    }
}

pub fn print_timeline(timeline: &Timeline) {
    if timeline.rows.is_empty() {
        println!("Nothing to show.");
        return;
    }
    for row in &timeline.rows {
        let indent = match row.kind {
            RowKind::Project => "",
            RowKind::Phase => "  ",
            RowKind::Task => "    ",
        };
        let critical = if row.critical { " !" } else { "" };
        println!(
            "{indent}{} [{} .. {}) {}%{critical}",
            row.label, row.start, row.end, row.progress
        );
    }
    if timeline.inferred_count > 0 {
        println!("Note: {} task date(s) were inferred.", timeline.inferred_count);
    }
}
