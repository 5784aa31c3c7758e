//! # Audio Feature Table
//!
//! Loads the flat per-song feature table, keeping only the year column and
//! the configured feature columns.

use crate::config::FeatureTableSettings;
use crate::error::{Error, Result};
use csv::Reader;
use std::path::Path;

/// One audio record: its year and the selected feature values
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub year: i32,
    /// Values in the order of [`FeatureTable::columns`]
    pub values: Vec<f64>,
}

/// Feature rows sharing one ordered set of column names
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(columns: Vec<String>, rows: Vec<FeatureRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Load from the configured file and columns
    pub fn load(settings: &FeatureTableSettings) -> Result<Self> {
        load_feature_table(
            &settings.path,
            &settings.year_column,
            &settings.feature_columns,
        )
    }
}

/// Load `year_column` and `feature_columns` from a CSV file
///
/// Other columns are ignored. Missing columns fail with [`Error::Schema`],
/// non-numeric cells with [`Error::Parse`].
pub fn load_feature_table<P: AsRef<Path>>(
    path: P,
    year_column: &str,
    feature_columns: &[String],
) -> Result<FeatureTable> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Schema {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };

    let year_idx = find(year_column)?;
    let feature_idx = feature_columns
        .iter()
        .map(|name| find(name.as_str()))
        .collect::<Result<Vec<usize>>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: usize| record.get(idx).unwrap_or_default().trim();

        let year_raw = cell(year_idx);
        let year = parse_year(year_raw).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
            line,
            column: year_column.to_string(),
            value: year_raw.to_string(),
        })?;

        let mut values = Vec::with_capacity(feature_idx.len());
        for (name, &idx) in feature_columns.iter().zip(feature_idx.iter()) {
            let raw = cell(idx);
            let value: f64 = raw.parse().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                line,
                column: name.clone(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }

        rows.push(FeatureRow { year, values });
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded feature table");
    Ok(FeatureTable::new(feature_columns.to_vec(), rows))
}

/// Years may be stored as integers or as integral floats ("1999.0")
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = raw.parse().ok()?;
    if value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}
