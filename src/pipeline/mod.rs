//! Pipeline stages
//!
//! The sentiment and word stages fan out over years; the timbre and
//! correlation stages work on whole tables.

pub mod parallel;
pub mod sentiment;
pub mod tables;
pub mod words;

pub use parallel::{apply_policy, parallel_map, YearFailure};
pub use sentiment::{SentimentPipeline, SentimentRun};
pub use tables::{run_correlate, run_timbre, CorrelationRun, TimbreRun};
pub use words::{WordPipeline, WordRun, YearWords};
