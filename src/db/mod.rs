pub mod connection;
pub mod migrations;
pub mod project_repo;
pub mod task_repo;

pub use connection::*;

use chrono::NaiveDate;
use rusqlite::ToSql;

pub(crate) fn date_to_sql(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

pub(crate) fn date_from_sql(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| s.parse().ok())
}

/// Append one `col = ?N` fragment and its value for a dynamically built UPDATE.
pub(crate) fn push_set(
    sets: &mut Vec<String>,
    values: &mut Vec<Box<dyn ToSql>>,
    col: &str,
    value: Box<dyn ToSql>,
) {
    values.push(value);
    sets.push(format!("{col} = ?{}", values.len()));
}
