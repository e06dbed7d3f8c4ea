pub mod cli;
pub mod codes;
pub mod db;
pub mod error;
pub mod graph;
pub mod models;
pub mod output;
pub mod rules;
pub mod schedule;
