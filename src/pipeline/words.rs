//! Yearly word frequency stage

use crate::analysis::{WordCount, WordCounter};
use crate::config::{FailurePolicy, OutputSettings, PipelineConfig, YearRange};
use crate::data::PartitionStore;
use crate::error::{Error, Result};
use crate::output::{stage_word_counts, TableBatch};
use crate::pipeline::parallel::{apply_policy, parallel_map, YearFailure};

/// Most frequent words of one year
#[derive(Debug, Clone, PartialEq)]
pub struct YearWords {
    pub year: i32,
    pub words: Vec<WordCount>,
}

/// Outcome of a word count run
#[derive(Debug)]
pub struct WordRun {
    /// Counted years, ascending
    pub years: Vec<YearWords>,
    pub failed: Vec<YearFailure>,
}

/// Counts the words of every year of a range
pub struct WordPipeline {
    store: PartitionStore,
    counter: WordCounter,
    years: YearRange,
    top_n: usize,
    policy: FailurePolicy,
    workers: Option<usize>,
}

impl WordPipeline {
    pub fn new(store: PartitionStore, counter: WordCounter, years: YearRange, top_n: usize) -> Self {
        Self {
            store,
            counter,
            years,
            top_n,
            policy: FailurePolicy::default(),
            workers: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            PartitionStore::from_settings(&config.partition_store),
            WordCounter::from_settings(&config.words),
            config.year_range,
            config.words.top_n,
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

    /// Top words of a single year; an empty partition yields no words
    pub fn count_year(&self, year: i32) -> Result<YearWords> {
        tracing::info!(year, "counting words");
        let documents = self.store.read_year(year)?;
        let mut words = self.counter.count_documents(&documents);
        words.truncate(self.top_n);
        Ok(YearWords { year, words })
    }

    pub fn run(&self) -> Result<WordRun> {
        if self.years.start > self.years.end {
            return Err(Error::InvalidYearRange {
                start: self.years.start,
                end: self.years.end,
            });
        }

        let years: Vec<i32> = self.years.years().collect();
        let results = parallel_map(&years, self.workers, |year| self.count_year(year))?;
        let (years, failed) = apply_policy(results, self.policy)?;
        Ok(WordRun { years, failed })
    }

    /// Run and write one `words_<year>.csv` per counted year
    pub fn run_and_write(&self, output: &OutputSettings) -> Result<WordRun> {
        let run = self.run()?;
        let mut batch = TableBatch::new();
        for year in &run.years {
            stage_word_counts(&mut batch, &output.words_path(year.year), &year.words)?;
        }
        batch.commit()?;
        Ok(run)
    }
}
