//! # Polarity Lexicon
//!
//! Valence lexicon for rule-based sentiment scoring of news sentences.
//! Valences use a -4..4 scale; negations flip and dampen the following
//! sentiment word, boosters push it away from zero.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scalar applied to a valence following a negation
const NEGATION_SCALAR: f64 = -0.74;

/// Normalization constant of the compound score
const COMPOUND_ALPHA: f64 = 15.0;

/// Number of preceding tokens checked for a negation
const NEGATION_WINDOW: usize = 3;

/// Polarity breakdown of one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Share of negative sentiment
    pub neg: f64,
    /// Share of neutral tokens
    pub neu: f64,
    /// Share of positive sentiment
    pub pos: f64,
    /// Normalized sum of valences, in [-1, 1]
    pub compound: f64,
}

/// Word valences plus negation and booster rules
pub struct PolarityLexicon {
    /// Word to valence mapping
    words: HashMap<String, f64>,
    /// Negation words
    negations: Vec<String>,
    /// Booster (positive) and dampener (negative) increments
    boosters: HashMap<String, f64>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    /// Create a lexicon with the default news vocabulary
    pub fn new() -> Self {
        let positive_words = [
            ("good", 1.9),
            ("great", 3.1),
            ("happy", 2.7),
            ("win", 2.8),
            ("wins", 2.7),
            ("won", 2.7),
            ("victory", 2.8),
            ("peace", 2.5),
            ("celebrate", 2.7),
            ("celebration", 2.6),
            ("cheer", 2.3),
            ("cheers", 2.1),
            ("hope", 1.9),
            ("success", 2.7),
            ("successful", 2.8),
            ("prosperity", 2.6),
            ("gain", 2.0),
            ("gains", 1.8),
            ("rise", 1.2),
            ("recovery", 1.8),
            ("improve", 1.9),
            ("improved", 2.1),
            ("love", 3.2),
            ("joy", 2.8),
            ("praise", 2.6),
            ("honor", 2.2),
            ("safe", 1.9),
            ("rescue", 1.5),
            ("support", 1.7),
            ("agree", 1.5),
            ("agreement", 2.2),
            ("free", 2.3),
            ("freedom", 3.2),
            ("strong", 2.3),
            ("best", 3.2),
            ("award", 2.5),
            ("beautiful", 2.9),
            ("boom", 1.6),
            ("growth", 1.6),
            ("friendly", 2.2),
        ];

        let negative_words = [
            ("bad", -2.5),
            ("war", -2.9),
            ("death", -2.9),
            ("dead", -3.3),
            ("die", -2.9),
            ("dies", -2.9),
            ("killed", -3.5),
            ("kill", -3.7),
            ("attack", -2.1),
            ("crisis", -3.1),
            ("fear", -2.2),
            ("fears", -1.8),
            ("fall", -0.9),
            ("falls", -1.0),
            ("crash", -1.7),
            ("loss", -1.3),
            ("losses", -1.7),
            ("fail", -2.5),
            ("failure", -2.3),
            ("poor", -2.1),
            ("poverty", -2.3),
            ("strike", -1.0),
            ("riot", -2.6),
            ("violence", -3.1),
            ("murder", -3.7),
            ("fire", -1.4),
            ("flood", -1.6),
            ("floods", -1.4),
            ("destroy", -2.5),
            ("destroyed", -2.8),
            ("homeless", -2.1),
            ("disaster", -3.1),
            ("panic", -2.3),
            ("depression", -2.7),
            ("sad", -2.1),
            ("angry", -2.3),
            ("hate", -2.7),
            ("threat", -2.4),
            ("injured", -1.7),
            ("arrest", -1.4),
        ];

        let words: HashMap<String, f64> = positive_words
            .iter()
            .chain(negative_words.iter())
            .map(|(w, s)| (w.to_string(), *s))
            .collect();

        let negations = [
            "not", "no", "never", "neither", "nor", "none", "nobody", "nothing", "without",
            "cannot", "can't", "don't", "doesn't", "didn't", "isn't", "wasn't", "won't",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();

        let boosters = [
            ("very", 0.293),
            ("extremely", 0.293),
            ("highly", 0.293),
            ("deeply", 0.293),
            ("greatly", 0.293),
            ("hugely", 0.293),
            ("most", 0.293),
            ("so", 0.293),
            ("slightly", -0.293),
            ("somewhat", -0.293),
            ("barely", -0.293),
            ("hardly", -0.293),
            ("marginally", -0.293),
        ]
        .iter()
        .map(|(w, s)| (w.to_string(), *s))
        .collect();

        Self {
            words,
            negations,
            boosters,
        }
    }

    /// Add or replace a word valence
    pub fn with_word(mut self, word: &str, valence: f64) -> Self {
        self.words.insert(word.to_lowercase(), valence);
        self
    }

    /// Get valence for a word
    pub fn get_valence(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    /// Check if a word is a negation
    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    /// Score a text
    ///
    /// 1. Look up token valences
    /// 2. Flip and dampen valences preceded by a negation
    /// 3. Shift valences preceded by a booster
    /// 4. Split into positive / negative / neutral shares and a compound score
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores {
                neg: 0.0,
                neu: 1.0,
                pos: 0.0,
                compound: 0.0,
            };
        }

        let mut valences = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.get_valence(token) else {
                valences.push(0.0);
                continue;
            };

            if i > 0 {
                if let Some(&boost) = self.boosters.get(&tokens[i - 1]) {
                    valence += boost * valence.signum();
                }
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|w| self.is_negation(w)) {
                valence *= NEGATION_SCALAR;
            }

            valences.push(valence);
        }

        let sum: f64 = valences.iter().sum();
        let compound = (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &v in &valences {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        PolarityScores {
            neg: neg_sum.abs() / total,
            neu: neu_count / total,
            pos: pos_sum / total,
            compound,
        }
    }
}

/// Lowercase words with surrounding punctuation removed
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
