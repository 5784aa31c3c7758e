//! # News Sentiment and Music Timbre
//!
//! A batch pipeline relating the tone of a century of news to the sound of
//! the music released in the same years.
//!
//! - News documents are stored as one CSV file per year. Every document is
//!   scored by a sentiment classifier and the scores of a year are reduced to
//!   one normalized vector.
//! - Audio timbre features are averaged per year and per decade.
//! - The two yearly tables are joined on year and correlated.
//!
//! ## Modules
//!
//! - [`config`] - Pipeline configuration
//! - [`data`] - Year partitions and the audio feature table
//! - [`sentiment`] - Per-document scoring and yearly aggregation
//! - [`analysis`] - Timbre reduction, correlation and word counts
//! - [`pipeline`] - Stages, parallel year driver
//! - [`output`] - Atomic CSV output and read-back
//! - [`report`] - Chart-ready tables
//!
//! ## Example
//!
//! ```rust,no_run
//! use news_timbre::config::PipelineConfig;
//! use news_timbre::pipeline::{run_correlate, run_timbre, SentimentPipeline};
//! use news_timbre::sentiment::LexiconScorer;
//!
//! fn main() -> news_timbre::Result<()> {
//!     let config = PipelineConfig::default();
//!
//!     SentimentPipeline::from_config(&config, LexiconScorer::new()).run_and_write(&config.output)?;
//!     run_timbre(&config)?;
//!     let run = run_correlate(&config)?;
//!     println!("{:?}", run.matrix.get("pos", "TimbreAvg1"));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod sentiment;

pub use config::{load_config, FailurePolicy, PipelineConfig, YearRange};
pub use error::{Error, Result, ScoringError, Stage};
pub use sentiment::{LexiconScorer, SentimentScorer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
