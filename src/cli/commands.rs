use clap::{Args, Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskplan",
    version = VERSION,
    about = "Project and task planning CLI",
    after_help = "\
NOTE:
  Run `taskplan init` to create a workspace (.taskplan/taskplan.db) in the
  current directory. Commands find the workspace by walking up from the
  current directory.

BEHAVIOR NOTES:
  Task codes (T001, T002, ...) are allocated from the historical maximum and
  never reused, even after deletions.
  Dependencies are advisory: `task add --after T404` is accepted even if T404
  does not exist. `taskplan validate` reports dangling codes and date
  conflicts.
  A complete task cannot move back to an earlier status.
  Setting a task's status to complete forces its completion percent to 100."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a taskplan workspace in this directory
    Init,

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Report dependency issues for a project (advisory, never blocks)
    #[command(after_help = "\
NOTE:
  Reports missing_dependency for codes with no matching task and
  date_conflict when a dependency is due after its dependent starts.
  Issues are a punch-list, not errors: the exit code is 0 either way.")]
    Validate {
        /// Project id
        #[arg(long)]
        project: i64,
    },

    /// Derived Gantt timeline (project → phase → task rows)
    Timeline {
        /// Restrict to one project id
        #[arg(long)]
        project: Option<i64>,

        /// Task ids to highlight as critical (comma-separated)
        #[arg(long, value_delimiter = ',')]
        critical: Vec<i64>,
    },

    /// Project progress rollup by phase
    Status {
        /// Project id
        #[arg(long)]
        project: i64,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Add {
        /// Project name
        name: String,
        /// planning | active | on_hold | closeout | complete
        #[arg(long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Target completion date (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,
        /// Budget in minor currency units (cents)
        #[arg(long)]
        budget: Option<i64>,
        /// Seed tasks by copying them from another project id
        #[arg(long)]
        from: Option<i64>,
    },
    /// List all projects
    List,
    /// Show project details
    Show {
        /// Project id
        id: i64,
    },
    /// Update a project
    Update {
        /// Project id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// planning | active | on_hold | closeout | complete
        #[arg(long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Target completion date (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,
        /// Budget in minor currency units (cents)
        #[arg(long)]
        budget: Option<i64>,
    },
    /// Delete a project and all of its tasks
    Delete {
        /// Project id
        id: i64,
    },
}

/// Task fields shared by update and bulk.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskFieldArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Working duration in days
    #[arg(long)]
    pub duration: Option<i64>,
    /// Comma-separated predecessor task codes, e.g. "T001,T002"
    #[arg(long)]
    pub after: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    /// not_started | in_progress | complete | on_hold
    #[arg(long)]
    pub status: Option<String>,
    /// high | medium | low
    #[arg(long)]
    pub priority: Option<String>,
    /// Phase label, e.g. "Phase 1: Foundations"
    #[arg(long)]
    pub phase: Option<String>,
    /// Budget in minor currency units (cents)
    #[arg(long)]
    pub budget: Option<i64>,
    /// Actual spend in minor currency units (cents)
    #[arg(long)]
    pub actual_budget: Option<i64>,
    /// yes | no
    #[arg(long)]
    pub approval: Option<String>,
    #[arg(long)]
    pub approver: Option<String>,
    /// Completion percent, 0-100
    #[arg(long)]
    pub percent: Option<i64>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a project (code is allocated automatically)
    Add {
        /// Task description
        description: String,
        /// Project id
        #[arg(long)]
        project: i64,
        #[command(flatten)]
        fields: TaskFieldArgs,
    },
    /// List a project's tasks grouped by phase
    List {
        /// Project id
        #[arg(long)]
        project: i64,
    },
    /// Show task details
    Show {
        /// Task id
        id: i64,
    },
    /// Update a task
    #[command(after_help = "\
NOTE:
  A complete task only accepts status=complete (no moving back).
  status=complete forces --percent to 100.")]
    Update {
        /// Task id
        id: i64,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        fields: TaskFieldArgs,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },
    /// Apply one patch to several tasks of a project
    #[command(after_help = "\
NOTE:
  Ids outside the project (or unknown) are skipped, not errors; the reported
  updated count says how many tasks actually changed.
  status=complete forces completion percent to 100 on every targeted task.")]
    Bulk {
        /// Project id
        #[arg(long)]
        project: i64,
        /// Task ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
        #[command(flatten)]
        fields: TaskFieldArgs,
    },
}
