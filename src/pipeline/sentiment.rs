//! Yearly sentiment stage
//!
//! Every year of the range is read, scored document by document and reduced
//! to one normalized vector, on a pool of worker threads.

use crate::config::{FailurePolicy, OutputSettings, PipelineConfig, YearRange};
use crate::data::PartitionStore;
use crate::error::{Error, Result};
use crate::output::{stage_sentiment_by_year, TableBatch};
use crate::pipeline::parallel::{apply_policy, parallel_map, YearFailure};
use crate::sentiment::{SentimentByYear, SentimentScorer, YearAggregator, YearSentiment};

/// Outcome of a sentiment run
#[derive(Debug)]
pub struct SentimentRun {
    /// One row per successful year, ascending
    pub table: SentimentByYear,
    /// Years skipped under [`FailurePolicy::Lenient`]
    pub failed: Vec<YearFailure>,
}

/// Reader, scorer and aggregator wired together for a range of years
pub struct SentimentPipeline<S> {
    store: PartitionStore,
    scorer: S,
    aggregator: YearAggregator,
    years: YearRange,
    policy: FailurePolicy,
    workers: Option<usize>,
}

impl<S: SentimentScorer> SentimentPipeline<S> {
    pub fn new(store: PartitionStore, scorer: S, years: YearRange) -> Self {
        let aggregator = YearAggregator::new(scorer.categories().to_vec());
        Self {
            store,
            scorer,
            aggregator,
            years,
            policy: FailurePolicy::default(),
            workers: None,
        }
    }

    pub fn from_config(config: &PipelineConfig, scorer: S) -> Self {
        Self::new(
            PartitionStore::from_settings(&config.partition_store),
            scorer,
            config.year_range,
        )
        .with_policy(config.failure_policy)
        .with_workers(config.workers)
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Read, score and aggregate a single year
    pub fn score_year(&self, year: i32) -> Result<YearSentiment> {
        tracing::info!(year, "scoring year");
        let documents = self.store.read_year(year)?;

        let scores = documents
            .iter()
            .map(|doc| self.scorer.score(doc))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| Error::Scoring { year, source })?;

        let aggregate = self.aggregator.aggregate(year, &scores)?;
        tracing::info!(year, documents = documents.len(), "finished year");
        Ok(aggregate)
    }

    /// Score every year of the range
    ///
    /// Nothing is written. The returned table is in ascending year order.
    pub fn run(&self) -> Result<SentimentRun> {
        if self.years.start > self.years.end {
            return Err(Error::InvalidYearRange {
                start: self.years.start,
                end: self.years.end,
            });
        }

        let years: Vec<i32> = self.years.years().collect();
        let results = parallel_map(&years, self.workers, |year| self.score_year(year))?;
        let (rows, failed) = apply_policy(results, self.policy)?;

        tracing::debug!(
            scored = rows.len(),
            skipped = failed.len(),
            "sentiment run complete"
        );
        Ok(SentimentRun {
            table: SentimentByYear::new(self.aggregator.categories().to_vec(), rows),
            failed,
        })
    }

    /// Run and replace the yearly sentiment table in `output`
    pub fn run_and_write(&self, output: &OutputSettings) -> Result<SentimentRun> {
        let run = self.run()?;
        let mut batch = TableBatch::new();
        stage_sentiment_by_year(&mut batch, &output.path(&output.sentiment_by_year), &run.table)?;
        batch.commit()?;
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::sentiment::CategoryScores;
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Scores "good" as positive, "bad" as negative and fails on "???"
    struct KeywordScorer {
        categories: Vec<String>,
    }

    impl KeywordScorer {
        fn new() -> Self {
            Self {
                categories: vec!["neg".to_string(), "pos".to_string()],
            }
        }
    }

    impl SentimentScorer for KeywordScorer {
        fn categories(&self) -> &[String] {
            &self.categories
        }

        fn score(&self, document: &str) -> std::result::Result<CategoryScores, ScoringError> {
            let values = match document {
                "good" => [0.0, 1.0],
                "bad" => [1.0, 0.0],
                "???" => return Err(ScoringError::new("unreadable document")),
                _ => [0.5, 0.5],
            };
            Ok(CategoryScores::from_parts(&self.categories, &values))
        }
    }

    fn write_partition(dir: &Path, year: i32, documents: &[&str]) {
        let mut content = String::from("sentence\n");
        for doc in documents {
            content.push_str(doc);
            content.push('\n');
        }
        fs::write(dir.join(format!("df_{}.csv", year)), content).unwrap();
    }

    fn pipeline(dir: &Path, start: i32, end: i32) -> SentimentPipeline<KeywordScorer> {
        SentimentPipeline::new(
            PartitionStore::new(dir, "df_{year}.csv", "sentence"),
            KeywordScorer::new(),
            YearRange::new(start, end),
        )
        .with_workers(Some(2))
    }

    #[test]
    fn test_score_year() {
        let dir = tempdir().unwrap();
        write_partition(dir.path(), 1950, &["good", "good", "bad", "meh"]);

        let row = pipeline(dir.path(), 1950, 1950).score_year(1950).unwrap();
        assert_eq!(row.year, 1950);
        assert_relative_eq!(row.shares[0], 1.5 / 4.0);
        assert_relative_eq!(row.shares[1], 2.5 / 4.0);
    }

    #[test]
    fn test_scoring_failure_names_year() {
        let dir = tempdir().unwrap();
        write_partition(dir.path(), 1951, &["good", "???"]);

        let err = pipeline(dir.path(), 1951, 1951).score_year(1951).unwrap_err();
        assert!(matches!(err, Error::Scoring { year: 1951, .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let dir = tempdir().unwrap();
        let err = pipeline(dir.path(), 1960, 1950).run().unwrap_err();
        assert!(matches!(err, Error::InvalidYearRange { start: 1960, end: 1950 }));
    }

    #[test]
    fn test_strict_run_writes_nothing_on_failure() {
        let dir = tempdir().unwrap();
        write_partition(dir.path(), 1950, &["good"]);
        let output = OutputSettings {
            dir: dir.path().join("out"),
            ..OutputSettings::default()
        };

        let err = pipeline(dir.path(), 1950, 1951)
            .run_and_write(&output)
            .unwrap_err();
        assert!(matches!(err, Error::PartitionNotFound { year: 1951, .. }));
        assert!(!output.path(&output.sentiment_by_year).exists());
    }

    #[test]
    fn test_lenient_run_skips_failed_years() {
        let dir = tempdir().unwrap();
        write_partition(dir.path(), 1950, &["good"]);
        write_partition(dir.path(), 1952, &["bad"]);

        let run = pipeline(dir.path(), 1950, 1952)
            .with_policy(FailurePolicy::Lenient)
            .run()
            .unwrap();
        assert_eq!(run.table.years(), vec![1950, 1952]);
        assert_eq!(run.failed.len(), 1);
        assert_eq!(run.failed[0].year, 1951);
    }
}
