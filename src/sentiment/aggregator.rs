//! # Year Aggregator
//!
//! Reduces the score vectors of one year to a single distribution over the
//! sentiment categories.

use super::scorer::CategoryScores;
use crate::error::{Error, Result, ScoringError};
use serde::{Deserialize, Serialize};

/// Normalized sentiment distribution of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSentiment {
    pub year: i32,
    /// One share per category, in category order; the shares sum to 1
    pub shares: Vec<f64>,
}

/// Per-year sentiment table, ascending by year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentByYear {
    pub categories: Vec<String>,
    pub rows: Vec<YearSentiment>,
}

impl SentimentByYear {
    /// Build a table, sorting rows by year
    pub fn new(categories: Vec<String>, mut rows: Vec<YearSentiment>) -> Self {
        rows.sort_by_key(|r| r.year);
        Self { categories, rows }
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn get(&self, year: i32) -> Option<&YearSentiment> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// Share of `category` in `year`
    pub fn share(&self, year: i32, category: &str) -> Option<f64> {
        let column = self.categories.iter().position(|c| c == category)?;
        self.get(year).map(|row| row.shares[column])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sums score vectors and L1-normalizes the result
#[derive(Debug, Clone)]
pub struct YearAggregator {
    categories: Vec<String>,
}

impl YearAggregator {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Aggregate all score vectors of `year`
    ///
    /// Each category is summed over documents, then every sum is divided by
    /// the total of the summed vector. Fails with [`Error::EmptyPartition`]
    /// when there are no vectors or the total is zero, and with
    /// [`Error::Scoring`] when a vector carries other categories.
    pub fn aggregate(&self, year: i32, scores: &[CategoryScores]) -> Result<YearSentiment> {
        if scores.is_empty() {
            return Err(Error::EmptyPartition { year });
        }

        let mut sums = vec![0.0; self.categories.len()];
        for vector in scores {
            if !vector.matches(&self.categories) {
                return Err(Error::Scoring {
                    year,
                    source: ScoringError::new(format!(
                        "expected categories {:?}, got {:?}",
                        self.categories,
                        vector.names().collect::<Vec<_>>()
                    )),
                });
            }
            for (sum, value) in sums.iter_mut().zip(vector.values()) {
                *sum += value;
            }
        }

        let total: f64 = sums.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(Error::EmptyPartition { year });
        }

        Ok(YearSentiment {
            year,
            shares: sums.into_iter().map(|s| s / total).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn categories() -> Vec<String> {
        vec!["neg".to_string(), "pos".to_string()]
    }

    fn vector(neg: f64, pos: f64) -> CategoryScores {
        CategoryScores::from_parts(&categories(), &[neg, pos])
    }

    #[test]
    fn test_normalized_shares() {
        let aggregator = YearAggregator::new(categories());
        let result = aggregator
            .aggregate(1920, &[vector(1.0, 0.0), vector(1.0, 1.0)])
            .unwrap();

        assert_eq!(result.year, 1920);
        assert_abs_diff_eq!(result.shares[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.shares[1], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shares_sum_to_one_and_stay_non_negative() {
        let aggregator = YearAggregator::new(categories());
        let inputs: Vec<CategoryScores> = (0..25)
            .map(|i| vector((i % 7) as f64 * 0.13, (i % 5) as f64 * 0.29))
            .collect();

        let result = aggregator.aggregate(1950, &inputs).unwrap();
        assert_abs_diff_eq!(result.shares.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(result.shares.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_order_independent() {
        let aggregator = YearAggregator::new(categories());
        let forward = vec![vector(0.5, 0.1), vector(0.0, 2.0), vector(0.25, 0.25)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = aggregator.aggregate(1960, &forward).unwrap();
        let b = aggregator.aggregate(1960, &reversed).unwrap();
        for (x, y) in a.shares.iter().zip(b.shares.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_no_documents() {
        let aggregator = YearAggregator::new(categories());
        let err = aggregator.aggregate(1933, &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyPartition { year: 1933 }));
    }

    #[test]
    fn test_zero_total() {
        let aggregator = YearAggregator::new(categories());
        let err = aggregator
            .aggregate(1934, &[vector(0.0, 0.0), vector(0.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPartition { year: 1934 }));
    }

    #[test]
    fn test_category_mismatch() {
        let aggregator = YearAggregator::new(categories());
        let other = CategoryScores::from_parts(&["pos".to_string(), "neg".to_string()], &[1.0, 0.0]);
        let err = aggregator.aggregate(1935, &[other]).unwrap_err();
        assert!(matches!(err, Error::Scoring { year: 1935, .. }));
    }

    #[test]
    fn test_table_sorted_and_lookup() {
        let rows = vec![
            YearSentiment { year: 1922, shares: vec![0.5, 0.5] },
            YearSentiment { year: 1920, shares: vec![0.25, 0.75] },
        ];
        let table = SentimentByYear::new(categories(), rows);

        assert_eq!(table.years(), vec![1920, 1922]);
        assert_eq!(table.share(1920, "pos"), Some(0.75));
        assert_eq!(table.share(1921, "pos"), None);
        assert_eq!(table.share(1922, "compound"), None);
    }
}
