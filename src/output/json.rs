use serde_json::{json, Value};

use crate::error::TaskplanError;
use crate::graph::Issue;
use crate::models::{Project, Task};
use crate::schedule::{PhaseGroup, Timeline, TimelineRow};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskplanError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn project_json(p: &Project) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "status": p.status.as_str(),
        "start_date": p.start_date,
        "target_date": p.target_date,
        "budget": p.budget,
        "created_at": p.created_at,
        "updated_at": p.updated_at
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "project_id": t.project_id,
        "code": t.code,
        "description": t.description,
        "start_date": t.start_date,
        "due_date": t.due_date,
        "duration_days": t.duration_days,
        "depends_on": t.depends_on,
        "owner": t.owner,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "phase": t.phase,
        "budget": t.budget,
        "actual_budget": t.actual_budget,
        "approval_required": t.approval_required.as_str(),
        "approver": t.approver,
        "completion_percent": t.completion_percent,
        "notes": t.notes
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "code": t.code,
        "description": t.description,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "completion_percent": t.completion_percent
    })
}

pub fn issue_json(i: &Issue) -> Value {
    json!({
        "type": i.kind.as_str(),
        "task_code": i.task_code,
        "dependency_code": i.dependency_code,
        "detail": i.detail
    })
}

pub fn phase_group_json(g: &PhaseGroup) -> Value {
    json!({
        "name": g.name,
        "progress": g.progress,
        "start_date": g.start_date,
        "end_date": g.end_date,
        "tasks": g.tasks.iter().map(task_summary).collect::<Vec<_>>()
    })
}

pub fn timeline_row_json(r: &TimelineRow) -> Value {
    json!({
        "id": r.id,
        "parent": r.parent,
        "kind": r.kind.as_str(),
        "label": r.label,
        "start": r.start,
        "end": r.end,
        "progress": r.progress,
        "color": r.color,
        "depends_on": r.depends_on,
        "critical": r.critical
    })
}

pub fn timeline_json(t: &Timeline) -> Value {
    json!({
        "rows": t.rows.iter().map(timeline_row_json).collect::<Vec<_>>(),
        "drilldown": t.drilldown,
        "inferred_count": t.inferred_count,
        "viewport_date": t.viewport_date
    })
}
