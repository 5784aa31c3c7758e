//! Chart-ready tables
//!
//! Rendering happens elsewhere; this module only shapes the aggregates into
//! the tables the charts consume.

use crate::analysis::{decade_label, decade_of, inner_join, TimbreByYear};
use crate::sentiment::SentimentByYear;
use serde::{Deserialize, Serialize};

/// Sentiment shares and timbre means of one year present in both tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedYear {
    pub year: i32,
    /// Decade label such as `"1920s"`
    pub decade: String,
    pub sentiment: Vec<f64>,
    pub timbre: Vec<f64>,
}

/// Year-joined rows for scatter and regression charts
pub fn joined_years(sentiment: &SentimentByYear, timbre: &TimbreByYear) -> Vec<JoinedYear> {
    let joined = inner_join(sentiment, timbre);
    joined
        .years
        .iter()
        .enumerate()
        .map(|(i, &year)| JoinedYear {
            year,
            decade: decade_label(decade_of(year)),
            sentiment: joined.sentiment.row(i).to_vec(),
            timbre: joined.timbre.row(i).to_vec(),
        })
        .collect()
}
