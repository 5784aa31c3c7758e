//! # Sentiment / Timbre Correlation
//!
//! Inner join of the yearly sentiment and timbre tables, and the Pearson
//! correlation of every (sentiment category, timbre feature) pair over the
//! joined years.

use super::timbre::TimbreByYear;
use crate::error::{Error, Result};
use crate::sentiment::SentimentByYear;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum number of joined years for a correlation
pub const MIN_JOINED_YEARS: usize = 2;

/// Largest rounding precision of [`CorrelationMatrix::to_long`]
pub const MAX_LONG_DECIMALS: u32 = 15;

/// Pearson correlation coefficient of two equally long columns
///
/// Returns `NaN` when fewer than two values are given or either column has
/// zero variance.
pub fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let x = x.slice(ndarray::s![..n]);
    let y = y.slice(ndarray::s![..n]);
    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Columns of the years present in both tables
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedColumns {
    /// Matched years, ascending
    pub years: Vec<i32>,
    /// One row per matched year, one column per sentiment category
    pub sentiment: Array2<f64>,
    /// One row per matched year, one column per timbre feature
    pub timbre: Array2<f64>,
}

impl JoinedColumns {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Inner join on year; years found in only one table are dropped
pub fn inner_join(sentiment: &SentimentByYear, timbre: &TimbreByYear) -> JoinedColumns {
    let timbre_by_year: HashMap<i32, &[f64]> = timbre
        .rows
        .iter()
        .map(|r| (r.year, r.means.as_slice()))
        .collect();

    let mut matched: Vec<(i32, &[f64], &[f64])> = sentiment
        .rows
        .iter()
        .filter_map(|row| {
            timbre_by_year
                .get(&row.year)
                .map(|means| (row.year, row.shares.as_slice(), *means))
        })
        .collect();
    matched.sort_by_key(|(year, _, _)| *year);

    let n_categories = sentiment.categories.len();
    let n_features = timbre.columns.len();
    let mut shares = Array2::zeros((matched.len(), n_categories));
    let mut means = Array2::zeros((matched.len(), n_features));
    for (i, (_, s, m)) in matched.iter().enumerate() {
        shares.row_mut(i).assign(&ArrayView1::from(*s));
        means.row_mut(i).assign(&ArrayView1::from(*m));
    }

    JoinedColumns {
        years: matched.iter().map(|(year, _, _)| *year).collect(),
        sentiment: shares,
        timbre: means,
    }
}

/// One cell of the correlation matrix in long form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    pub sentiment: String,
    pub feature: String,
    pub correlation: f64,
}

/// Pearson coefficients, rows = sentiment categories, columns = features
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, category: &str, feature: &str) -> Option<f64> {
        let row = self.categories.iter().position(|c| c == category)?;
        let col = self.features.iter().position(|f| f == feature)?;
        Some(self.values[[row, col]])
    }

    /// Reorder rows: categories listed in `order` first, the rest after
    /// in their current order
    pub fn with_category_order(&self, order: &[String]) -> Self {
        let mut indices: Vec<usize> = Vec::with_capacity(self.categories.len());
        for name in order {
            if let Some(idx) = self.categories.iter().position(|c| c == name) {
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
        }
        for idx in 0..self.categories.len() {
            if !indices.contains(&idx) {
                indices.push(idx);
            }
        }

        Self {
            categories: indices.iter().map(|&i| self.categories[i].clone()).collect(),
            features: self.features.clone(),
            values: self.values.select(Axis(0), &indices),
        }
    }

    /// Long form for heat maps, values rounded to `decimals` places
    ///
    /// `decimals` is capped at [`MAX_LONG_DECIMALS`].
    pub fn to_long(&self, decimals: u32) -> Vec<CorrelationCell> {
        let scale = 10f64.powi(decimals.min(MAX_LONG_DECIMALS) as i32);
        let mut cells = Vec::with_capacity(self.values.len());
        for (i, category) in self.categories.iter().enumerate() {
            for (j, feature) in self.features.iter().enumerate() {
                cells.push(CorrelationCell {
                    sentiment: category.clone(),
                    feature: feature.clone(),
                    correlation: (self.values[[i, j]] * scale).round() / scale,
                });
            }
        }
        cells
    }
}

/// Correlate every sentiment category with every timbre feature
///
/// Fails with [`Error::InsufficientData`] when fewer than two years are
/// present in both tables.
pub fn correlate(sentiment: &SentimentByYear, timbre: &TimbreByYear) -> Result<CorrelationMatrix> {
    let joined = inner_join(sentiment, timbre);
    if joined.len() < MIN_JOINED_YEARS {
        return Err(Error::InsufficientData {
            matched: joined.len(),
            required: MIN_JOINED_YEARS,
        });
    }

    let values = Array2::from_shape_fn(
        (sentiment.categories.len(), timbre.columns.len()),
        |(i, j)| pearson(joined.sentiment.column(i), joined.timbre.column(j)),
    );

    tracing::debug!(years = joined.len(), "computed correlation matrix");
    Ok(CorrelationMatrix {
        categories: sentiment.categories.clone(),
        features: timbre.columns.clone(),
        values,
    })
}
