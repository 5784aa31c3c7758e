//! # Sentiment
//!
//! Document scoring and per-year aggregation of sentiment scores.

mod aggregator;
mod lexicon;
mod scorer;

pub use aggregator::{SentimentByYear, YearAggregator, YearSentiment};
pub use lexicon::{PolarityLexicon, PolarityScores};
pub use scorer::{CategoryScores, LexiconScorer, SentimentScorer};
