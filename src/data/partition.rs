//! # Year Partitions
//!
//! Reads the news documents of one year from a directory holding one CSV
//! file per year.

use crate::config::PartitionSettings;
use crate::error::{Error, Result};
use csv::Reader;
use std::path::{Path, PathBuf};

/// Directory of per-year CSV files
#[derive(Debug, Clone)]
pub struct PartitionStore {
    dir: PathBuf,
    file_pattern: String,
    text_column: String,
}

impl PartitionStore {
    /// Create a store; `file_pattern` must contain a `{year}` placeholder
    pub fn new(
        dir: impl Into<PathBuf>,
        file_pattern: impl Into<String>,
        text_column: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            file_pattern: file_pattern.into(),
            text_column: text_column.into(),
        }
    }

    pub fn from_settings(settings: &PartitionSettings) -> Self {
        Self::new(
            &settings.dir,
            settings.file_pattern.as_str(),
            settings.text_column.as_str(),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the documents of `year`
    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir
            .join(self.file_pattern.replace("{year}", &year.to_string()))
    }

    /// Read every document of `year`, in file order
    pub fn read_year(&self, year: i32) -> Result<Vec<String>> {
        let path = self.path_for(year);
        if !path.is_file() {
            return Err(Error::PartitionNotFound { year, path });
        }

        let malformed = |source: csv::Error| Error::Partition {
            year,
            path: path.clone(),
            source,
        };

        let mut reader = Reader::from_path(&path).map_err(malformed)?;
        let column = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .position(|h| h == self.text_column)
            .ok_or_else(|| Error::Schema {
                path: path.clone(),
                column: self.text_column.clone(),
            })?;

        let mut documents = Vec::new();
        for result in reader.records() {
            let record = result.map_err(malformed)?;
            documents.push(record.get(column).unwrap_or_default().to_string());
        }

        tracing::debug!(year, documents = documents.len(), "read partition");
        Ok(documents)
    }
}
