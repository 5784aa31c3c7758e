//! # Document Scorers
//!
//! A scorer turns one document into a fixed, named set of category scores.
//! The pipeline treats scorers as black boxes; [`LexiconScorer`] is the
//! built-in rule-based implementation.

use super::lexicon::PolarityLexicon;
use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Named category scores for one document, in the scorer's category order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    entries: Vec<(String, f64)>,
}

impl CategoryScores {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Build from parallel name and value slices
    pub fn from_parts(names: &[String], values: &[f64]) -> Self {
        Self {
            entries: names.iter().cloned().zip(values.iter().copied()).collect(),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the category names equal `expected`, in order
    pub fn matches(&self, expected: &[String]) -> bool {
        self.entries.len() == expected.len()
            && self
                .entries
                .iter()
                .zip(expected)
                .all(|((name, _), want)| name == want)
    }
}

/// Sentiment classifier applied to each document
///
/// Implementations must be deterministic and return the categories listed
/// by [`SentimentScorer::categories`], in that order, for every document.
pub trait SentimentScorer: Send + Sync {
    /// Category names produced by [`SentimentScorer::score`]
    fn categories(&self) -> &[String];

    /// Score a single document
    fn score(&self, document: &str) -> Result<CategoryScores, ScoringError>;
}

/// Rule-based scorer producing `neg`, `neu`, `pos` and `compound`
pub struct LexiconScorer {
    lexicon: PolarityLexicon,
    categories: Vec<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::with_lexicon(PolarityLexicon::new())
    }

    pub fn with_lexicon(lexicon: PolarityLexicon) -> Self {
        Self {
            lexicon,
            categories: ["neg", "neu", "pos", "compound"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl SentimentScorer for LexiconScorer {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn score(&self, document: &str) -> Result<CategoryScores, ScoringError> {
        let polarity = self.lexicon.polarity_scores(document);
        Ok(CategoryScores::from_parts(
            &self.categories,
            &[polarity.neg, polarity.neu, polarity.pos, polarity.compound],
        ))
    }
}
