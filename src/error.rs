use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    ProjectNotFound,
    TaskNotFound,
    ValidationError,
    StateTransitionError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StateTransitionError => "STATE_TRANSITION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskplanError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskplanError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "No taskplan workspace found. Run `taskplan init` first.",
        )
    }

    pub fn project_not_found(id: i64) -> Self {
        Self::new(ErrorCode::ProjectNotFound, format!("Project not found: {id}"))
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn percent_out_of_range(value: i64) -> Self {
        Self::new(
            ErrorCode::ValidationError,
            format!("completion percent must be between 0 and 100, got {value}"),
        )
    }

    pub fn cannot_move_back(code: &str) -> Self {
        Self::new(
            ErrorCode::StateTransitionError,
            format!("Task {code} is complete and cannot move back to an earlier status"),
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for TaskplanError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
