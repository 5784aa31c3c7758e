//! Pipeline configuration
//!
//! Every stage receives its locations and options from [`PipelineConfig`].
//! Configuration can be loaded from TOML or JSON; missing fields fall back to
//! the defaults below.

use crate::analysis::correlation::MAX_LONG_DECIMALS;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Per-year news partitions
    pub partition_store: PartitionSettings,
    /// Flat audio feature table
    pub feature_table: FeatureTableSettings,
    /// Derived table locations
    pub output: OutputSettings,
    /// Years processed by the sentiment and word stages
    pub year_range: YearRange,
    /// What to do when a single year fails
    pub failure_policy: FailurePolicy,
    /// Worker threads for per-year stages (None = available parallelism)
    pub workers: Option<usize>,
    /// Word frequency settings
    pub words: WordSettings,
    /// Chart table settings
    pub report: ReportSettings,
}

impl PipelineConfig {
    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.year_range.start > self.year_range.end {
            return Err(ConfigError::Invalid(format!(
                "year range start {} is after end {}",
                self.year_range.start, self.year_range.end
            )));
        }
        if !self.partition_store.file_pattern.contains("{year}") {
            return Err(ConfigError::Invalid(format!(
                "partition file pattern '{}' has no {{year}} placeholder",
                self.partition_store.file_pattern
            )));
        }
        if self.feature_table.feature_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one feature column is required".to_string(),
            ));
        }
        if self.report.decimals > MAX_LONG_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "report decimals {} exceeds {}",
                self.report.decimals, MAX_LONG_DECIMALS
            )));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Inclusive range of years
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 1920,
            end: 2020,
        }
    }
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Behavior of a per-year stage when one year fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failing year
    #[default]
    Strict,
    /// Log the failure, skip the year and continue
    Lenient,
}

/// Location and layout of the news partition store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PartitionSettings {
    /// Directory holding one file per year
    pub dir: PathBuf,
    /// File name with a `{year}` placeholder
    pub file_pattern: String,
    /// Column holding one document per row
    pub text_column: String,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/archive"),
            file_pattern: "df_{year}.csv".to_string(),
            text_column: "sentence".to_string(),
        }
    }
}

/// Location and columns of the audio feature table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureTableSettings {
    pub path: PathBuf,
    pub year_column: String,
    pub feature_columns: Vec<String>,
}

impl Default for FeatureTableSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/YearPredictionMSD.csv"),
            year_column: "year".to_string(),
            feature_columns: (1..=12).map(|i| format!("TimbreAvg{}", i)).collect(),
        }
    }
}

/// Output directory and file names of the derived tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub sentiment_by_year: String,
    pub timbre_by_year: String,
    pub timbre_by_decade: String,
    pub correlation: String,
    pub correlation_long: String,
    pub joined_by_year: String,
    /// Subdirectory for per-year word counts
    pub words_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("preprocess"),
            sentiment_by_year: "nltk_scores_by_year.csv".to_string(),
            timbre_by_year: "timbre_avg_by_year.csv".to_string(),
            timbre_by_decade: "timbre_avg_by_decade.csv".to_string(),
            correlation: "timbre_sentiment_correlation.csv".to_string(),
            correlation_long: "correlation_long.csv".to_string(),
            joined_by_year: "timbre_sentiment_by_year.csv".to_string(),
            words_dir: "words".to_string(),
        }
    }
}

impl OutputSettings {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn words_path(&self, year: i32) -> PathBuf {
        self.dir.join(&self.words_dir).join(format!("words_{}.csv", year))
    }
}

/// Word frequency settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WordSettings {
    /// Words dropped from the counts
    pub stop_words: Vec<String>,
    /// Phrases removed from the text before tokenizing
    pub strip_phrases: Vec<String>,
    /// Number of words kept per year in the output
    pub top_n: usize,
}

impl Default for WordSettings {
    fn default() -> Self {
        let stop_words = [
            "a", "an", "the", "and", "so", "therefore", "for", "is", "are", "was", "were", "am",
            "be", "as", "has", "had", "of", "to", "by", "then", "on", "at", "with", "from", "in",
            "it", "this", "that", "those", "who", "whose", "whom", "which", "his", "he", "her",
            "she", "they", "them", "their", "s",
        ];
        Self {
            stop_words: stop_words.iter().map(|w| w.to_string()).collect(),
            strip_phrases: vec!["new york times".to_string()],
            top_n: 100,
        }
    }
}

/// Settings for the chart-ready tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Display order of sentiment categories; unknown categories follow
    pub category_order: Vec<String>,
    /// Decimal places of the long correlation table
    pub decimals: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            category_order: ["neg", "neu", "pos", "compound"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            decimals: 2,
        }
    }
}

/// Load configuration from a TOML or JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::FileError(e.to_string()))?;

    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let config: PipelineConfig = match ext {
        "json" => {
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        _ => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
    };

    config.validate()?;
    Ok(config)
}

/// Save configuration to a TOML or JSON file
pub fn save_config<P: AsRef<Path>>(config: &PipelineConfig, path: P) -> Result<(), ConfigError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let content = match ext {
        "json" => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?,
        "toml" => toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?,
        _ => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
    };

    std::fs::write(path, content).map_err(|e| ConfigError::FileError(e.to_string()))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("config file error: {0}")]
    FileError(String),
    /// Parse error
    #[error("config parse error: {0}")]
    ParseError(String),
    /// Serialization error
    #[error("config serialize error: {0}")]
    SerializeError(String),
    /// Unsupported format
    #[error("unsupported config format: '{0}'")]
    UnsupportedFormat(String),
    /// Semantically invalid configuration
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.year_range, YearRange::new(1920, 2020));
        assert_eq!(config.year_range.len(), 101);
        assert_eq!(config.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.feature_table.feature_columns.len(), 12);
        assert_eq!(config.feature_table.feature_columns[0], "TimbreAvg1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reversed_range() {
        let mut config = PipelineConfig::default();
        config.year_range = YearRange::new(2000, 1990);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_pattern_without_year() {
        let mut config = PipelineConfig::default();
        config.partition_store.file_pattern = "news.csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_report_decimals() {
        let mut config = PipelineConfig::default();
        config.report.decimals = MAX_LONG_DECIMALS;
        assert!(config.validate().is_ok());

        config.report.decimals = 400;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            r#"
failure_policy = "lenient"
workers = 4

[year_range]
start = 1950
end = 1959

[output]
dir = "out"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Lenient);
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.year_range.len(), 10);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.sentiment_by_year, "nltk_scores_by_year.csv");
        assert_eq!(config.partition_store.text_column, "sentence");
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let mut config = PipelineConfig::default();
        config.words.top_n = 25;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn test_output_paths() {
        let output = OutputSettings::default();
        assert_eq!(
            output.path(&output.timbre_by_decade),
            PathBuf::from("preprocess/timbre_avg_by_decade.csv")
        );
        assert_eq!(
            output.words_path(1920),
            PathBuf::from("preprocess/words/words_1920.csv")
        );
    }
}
