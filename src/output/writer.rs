//! All-or-nothing CSV output
//!
//! Tables are first written to temporary files next to their targets. Only
//! when every table of a stage has been written are the temporary files
//! renamed over the targets, so a failing stage never leaves a partially
//! written or half-updated set of files behind.

use crate::analysis::{CorrelationCell, CorrelationMatrix, TimbreByDecade, TimbreByYear, WordCount};
use crate::error::{Error, Result};
use crate::report::JoinedYear;
use crate::sentiment::SentimentByYear;
use csv::Writer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Tables staged for one stage's output
#[derive(Debug, Default)]
pub struct TableBatch {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl TableBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Write a table to a temporary file destined for `path`
    pub fn stage<F>(&mut self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<&mut File>) -> Result<()>,
    {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = Writer::from_writer(temp.as_file_mut());
            write(&mut writer).map_err(|e| match e {
                Error::Csv(source) => Error::Write {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?;
            writer.flush()?;
        }
        self.staged.push((temp, path.to_path_buf()));
        Ok(())
    }

    /// Move every staged file over its target
    ///
    /// Each rename is atomic on its own, but the batch is not: if a rename
    /// fails, targets renamed before it already hold the new content while
    /// the rest keep the old one. Staging failures never touch any target.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (temp, path) in self.staged {
            temp.persist(&path).map_err(|e| Error::Io(e.error))?;
            tracing::info!(path = %path.display(), "wrote table");
            written.push(path);
        }
        Ok(written)
    }
}

fn cell(value: f64) -> String {
    value.to_string()
}

/// `year, <categories...>`
pub fn stage_sentiment_by_year(
    batch: &mut TableBatch,
    path: &Path,
    table: &SentimentByYear,
) -> Result<()> {
    batch.stage(path, |writer| {
        let mut header = vec!["year".to_string()];
        header.extend(table.categories.iter().cloned());
        writer.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(row.shares.iter().map(|&v| cell(v)));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// `year, <features...>, decade`
pub fn stage_timbre_by_year(batch: &mut TableBatch, path: &Path, table: &TimbreByYear) -> Result<()> {
    batch.stage(path, |writer| {
        let mut header = vec!["year".to_string()];
        header.extend(table.columns.iter().cloned());
        header.push("decade".to_string());
        writer.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(row.means.iter().map(|&v| cell(v)));
            record.push(row.decade.to_string());
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// `decade, <features...>`
pub fn stage_timbre_by_decade(
    batch: &mut TableBatch,
    path: &Path,
    table: &TimbreByDecade,
) -> Result<()> {
    batch.stage(path, |writer| {
        let mut header = vec!["decade".to_string()];
        header.extend(table.columns.iter().cloned());
        writer.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.decade.to_string()];
            record.extend(row.means.iter().map(|&v| cell(v)));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// `sentiment, <features...>`, one row per category
pub fn stage_correlation_matrix(
    batch: &mut TableBatch,
    path: &Path,
    matrix: &CorrelationMatrix,
) -> Result<()> {
    batch.stage(path, |writer| {
        let mut header = vec!["sentiment".to_string()];
        header.extend(matrix.features.iter().cloned());
        writer.write_record(&header)?;

        for (category, values) in matrix.categories.iter().zip(matrix.values.rows()) {
            let mut record = vec![category.clone()];
            record.extend(values.iter().map(|&v| cell(v)));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// `sentiment, feature, correlation`
pub fn stage_correlation_long(
    batch: &mut TableBatch,
    path: &Path,
    cells: &[CorrelationCell],
) -> Result<()> {
    batch.stage(path, |writer| {
        writer.write_record(["sentiment", "feature", "correlation"])?;
        for c in cells {
            writer.write_record([
                c.sentiment.as_str(),
                c.feature.as_str(),
                cell(c.correlation).as_str(),
            ])?;
        }
        Ok(())
    })
}

/// `year, decade, <categories...>, <features...>`
pub fn stage_joined_years(
    batch: &mut TableBatch,
    path: &Path,
    categories: &[String],
    features: &[String],
    rows: &[JoinedYear],
) -> Result<()> {
    batch.stage(path, |writer| {
        let mut header = vec!["year".to_string(), "decade".to_string()];
        header.extend(categories.iter().cloned());
        header.extend(features.iter().cloned());
        writer.write_record(&header)?;

        for row in rows {
            let mut record = vec![row.year.to_string(), row.decade.clone()];
            record.extend(row.sentiment.iter().map(|&v| cell(v)));
            record.extend(row.timbre.iter().map(|&v| cell(v)));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// `word, count`
pub fn stage_word_counts(batch: &mut TableBatch, path: &Path, words: &[WordCount]) -> Result<()> {
    batch.stage(path, |writer| {
        writer.write_record(["word", "count"])?;
        for word in words {
            writer.write_record([word.word.as_str(), word.count.to_string().as_str()])?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::YearSentiment;
    use tempfile::tempdir;

    fn table() -> SentimentByYear {
        SentimentByYear::new(
            vec!["neg".to_string(), "pos".to_string()],
            vec![
                YearSentiment { year: 1921, shares: vec![0.0, 1.0] },
                YearSentiment { year: 1920, shares: vec![0.25, 0.75] },
            ],
        )
    }

    #[test]
    fn test_sentiment_table_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.csv");

        let mut batch = TableBatch::new();
        stage_sentiment_by_year(&mut batch, &path, &table()).unwrap();
        assert!(!path.exists());

        let written = batch.commit().unwrap();
        assert_eq!(written, vec![path.clone()]);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "year,neg,pos\n1920,0.25,0.75\n1921,0,1\n");
    }

    #[test]
    fn test_failed_stage_keeps_previous_output() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, "old a\n").unwrap();
        fs::write(&second, "old b\n").unwrap();

        let mut batch = TableBatch::new();
        stage_sentiment_by_year(&mut batch, &first, &table()).unwrap();
        let err = batch.stage(&second, |_| Err(Error::EmptyPartition { year: 1920 }));
        assert!(err.is_err());
        drop(batch);

        assert_eq!(fs::read_to_string(&first).unwrap(), "old a\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "old b\n");
        // the temporary files are cleaned up with the batch
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_csv_failure_while_staging_is_a_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");

        let mut batch = TableBatch::new();
        let err = batch
            .stage(&path, |writer| {
                writer.write_record(["a"])?;
                writer.write_record(["b", "c"])?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, Error::Write { ref path, .. } if path.ends_with("ragged.csv")));
        assert_eq!(err.stage(), crate::error::Stage::Write);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_commit_stops_at_first_failed_rename() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let blocked = dir.path().join("b.csv");
        fs::write(&first, "old a\n").unwrap();
        fs::create_dir(&blocked).unwrap();

        let mut batch = TableBatch::new();
        stage_sentiment_by_year(&mut batch, &first, &table()).unwrap();
        stage_sentiment_by_year(&mut batch, &blocked, &table()).unwrap();
        let err = batch.commit().unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        // renames are not rolled back
        assert!(fs::read_to_string(&first).unwrap().starts_with("year,neg,pos\n"));
        assert!(blocked.is_dir());
        // the unrenamed temporary file is removed
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        fs::write(&path, "stale content that is longer than the new table\n").unwrap();

        let mut batch = TableBatch::new();
        let words = vec![WordCount { word: "strike".to_string(), count: 2 }];
        stage_word_counts(&mut batch, &path, &words).unwrap();
        batch.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "word,count\nstrike,2\n");
    }
}
