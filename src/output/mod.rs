//! Derived table output and read-back.

mod reader;
mod writer;

pub use reader::{read_sentiment_by_year, read_timbre_by_year};
pub use writer::{
    stage_correlation_long, stage_correlation_matrix, stage_joined_years, stage_sentiment_by_year,
    stage_timbre_by_decade, stage_timbre_by_year, stage_word_counts, TableBatch,
};
