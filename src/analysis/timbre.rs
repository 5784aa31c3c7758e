//! # Timbre Reduction
//!
//! Per-year and per-decade means of the audio feature table.
//!
//! The decade mean is the mean of the yearly means: every year carries the
//! same weight inside its decade, however many records it has.

use crate::data::FeatureTable;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decade key of a year: `floor(year / 10) * 10`
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Display label of a decade, e.g. `"1920s"`
pub fn decade_label(decade: i32) -> String {
    format!("{}s", decade)
}

/// Feature means of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTimbre {
    pub year: i32,
    pub decade: i32,
    pub means: Vec<f64>,
}

/// Per-year feature means, ascending by year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimbreByYear {
    pub columns: Vec<String>,
    pub rows: Vec<YearTimbre>,
}

impl TimbreByYear {
    pub fn new(columns: Vec<String>, mut rows: Vec<YearTimbre>) -> Self {
        rows.sort_by_key(|r| r.year);
        Self { columns, rows }
    }

    pub fn get(&self, year: i32) -> Option<&YearTimbre> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    /// Values of one feature across years
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r.means[idx]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Feature means of one decade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeTimbre {
    pub decade: i32,
    pub means: Vec<f64>,
}

/// Per-decade feature means, ascending by decade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimbreByDecade {
    pub columns: Vec<String>,
    pub rows: Vec<DecadeTimbre>,
}

impl TimbreByDecade {
    pub fn get(&self, decade: i32) -> Option<&DecadeTimbre> {
        self.rows.iter().find(|r| r.decade == decade)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group `(key, values)` pairs by key and average each column
fn grouped_means<'a, I>(width: usize, items: I) -> BTreeMap<i32, Vec<f64>>
where
    I: IntoIterator<Item = (i32, &'a [f64])>,
{
    let mut groups: BTreeMap<i32, (Array1<f64>, usize)> = BTreeMap::new();
    for (key, values) in items {
        let entry = groups
            .entry(key)
            .or_insert_with(|| (Array1::zeros(width), 0));
        entry.0 += &ArrayView1::from(values);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| (key, (sum / count as f64).to_vec()))
        .collect()
}

/// Mean of every feature per distinct year; absent years get no row
pub fn mean_by_year(table: &FeatureTable) -> TimbreByYear {
    let width = table.columns.len();
    let rows = grouped_means(
        width,
        table.rows.iter().map(|r| (r.year, r.values.as_slice())),
    )
    .into_iter()
    .map(|(year, means)| YearTimbre {
        year,
        decade: decade_of(year),
        means,
    })
    .collect();

    TimbreByYear::new(table.columns.clone(), rows)
}

/// Mean of the yearly means per decade
pub fn mean_by_decade(by_year: &TimbreByYear) -> TimbreByDecade {
    let width = by_year.columns.len();
    let rows = grouped_means(
        width,
        by_year.rows.iter().map(|r| (r.decade, r.means.as_slice())),
    )
    .into_iter()
    .map(|(decade, means)| DecadeTimbre { decade, means })
    .collect();

    TimbreByDecade {
        columns: by_year.columns.clone(),
        rows,
    }
}

/// Both aggregates of a feature table
pub fn reduce(table: &FeatureTable) -> (TimbreByYear, TimbreByDecade) {
    let by_year = mean_by_year(table);
    let by_decade = mean_by_decade(&by_year);
    tracing::debug!(
        records = table.len(),
        years = by_year.len(),
        decades = by_decade.len(),
        "reduced timbre table"
    );
    (by_year, by_decade)
}
