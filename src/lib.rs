// Statistics engine for per-container resource usage: bounded history,
// bounded sampling and percentile summaries.

pub mod config;
pub mod history;
pub mod models;
pub mod monitor;
pub mod sampling;
pub mod source;
pub mod summary;
pub mod timed_store;
