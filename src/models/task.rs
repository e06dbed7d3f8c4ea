use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Complete,
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::OnHold => "on_hold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "complete" => Some(Self::Complete),
            "on_hold" => Some(Self::OnHold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    Yes,
    No,
}

impl Approval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    /// Human-readable per-project code, `T` plus a zero-padded sequence.
    pub code: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub duration_days: Option<i64>,
    /// Comma-separated sibling task codes. Free-form at write time;
    /// referential integrity is reported by the validator, not enforced here.
    pub depends_on: Option<String>,
    pub owner: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub phase: Option<String>,
    pub budget: Option<i64>,
    pub actual_budget: Option<i64>,
    pub approval_required: Approval,
    pub approver: Option<String>,
    pub completion_percent: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Dependency codes split on comma, trimmed, uppercased. Empty tokens dropped.
    pub fn dependency_codes(&self) -> Vec<String> {
        parse_dependency_codes(self.depends_on.as_deref())
    }
}

pub fn parse_dependency_codes(depends_on: Option<&str>) -> Vec<String> {
    depends_on
        .unwrap_or("")
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Fields accepted when creating a task. The code is allocated, not supplied.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub duration_days: Option<i64>,
    pub depends_on: Option<String>,
    pub owner: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub phase: Option<String>,
    pub budget: Option<i64>,
    pub actual_budget: Option<i64>,
    pub approval_required: Option<Approval>,
    pub approver: Option<String>,
    pub completion_percent: Option<i64>,
    pub notes: Option<String>,
}

/// Partial update for a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub duration_days: Option<i64>,
    pub depends_on: Option<String>,
    pub owner: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub phase: Option<String>,
    pub budget: Option<i64>,
    pub actual_budget: Option<i64>,
    pub approval_required: Option<Approval>,
    pub approver: Option<String>,
    pub completion_percent: Option<i64>,
    pub notes: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.start_date.is_none()
            && self.due_date.is_none()
            && self.duration_days.is_none()
            && self.depends_on.is_none()
            && self.owner.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.phase.is_none()
            && self.budget.is_none()
            && self.actual_budget.is_none()
            && self.approval_required.is_none()
            && self.approver.is_none()
            && self.completion_percent.is_none()
            && self.notes.is_none()
    }
}
