//! # Word Frequencies
//!
//! Word counts per year, the input of the word-cloud charts.

use crate::config::WordSettings;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Occurrences of one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Counts lowercase alphabetic words, skipping stop words and boilerplate
#[derive(Debug, Clone)]
pub struct WordCounter {
    stop_words: HashSet<String>,
    strip_phrases: Vec<String>,
}

impl Default for WordCounter {
    fn default() -> Self {
        Self::from_settings(&WordSettings::default())
    }
}

impl WordCounter {
    pub fn new<S: AsRef<str>>(stop_words: &[S], strip_phrases: &[S]) -> Self {
        Self {
            stop_words: stop_words
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            strip_phrases: strip_phrases
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_settings(settings: &WordSettings) -> Self {
        Self::new(&settings.stop_words, &settings.strip_phrases)
    }

    /// Word counts of `text`, most frequent first, ties alphabetical
    pub fn count(&self, text: &str) -> Vec<WordCount> {
        let mut text = text.to_lowercase();
        for phrase in &self.strip_phrases {
            text = text.replace(phrase.as_str(), " ");
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in text
            .split(|c: char| !c.is_ascii_lowercase())
            .filter(|w| !w.is_empty())
        {
            if !self.stop_words.contains(word) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }

        let mut words: Vec<WordCount> = counts
            .into_iter()
            .map(|(word, count)| WordCount {
                word: word.to_string(),
                count,
            })
            .collect();
        words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        words
    }

    /// Word counts over all documents of a year
    pub fn count_documents(&self, documents: &[String]) -> Vec<WordCount> {
        self.count(&documents.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sorted_by_frequency() {
        let counter = WordCounter::new::<&str>(&[], &[]);
        let words = counter.count("Rain, rain; sun. RAIN and sun wind");

        assert_eq!(words[0], WordCount { word: "rain".to_string(), count: 3 });
        assert_eq!(words[1], WordCount { word: "sun".to_string(), count: 2 });
        // ties are alphabetical
        assert_eq!(words[2].word, "and");
        assert_eq!(words[3].word, "wind");
    }

    #[test]
    fn test_stop_words_dropped() {
        let counter = WordCounter::default();
        let words = counter.count("The mayor and the council met at the hall");
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();

        assert!(!names.contains(&"the"));
        assert!(!names.contains(&"and"));
        assert!(names.contains(&"mayor"));
        assert!(names.contains(&"council"));
    }

    #[test]
    fn test_boilerplate_phrase_removed() {
        let counter = WordCounter::default();
        let words = counter.count("Special to The New York Times. Storm hits New York");
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();

        assert!(!names.contains(&"times"));
        // only the standalone mention of the city remains
        let york = words.iter().find(|w| w.word == "york").unwrap();
        assert_eq!(york.count, 1);
    }

    #[test]
    fn test_possessive_s_is_a_stop_word() {
        let counter = WordCounter::default();
        let words = counter.count("the nation's capital");
        assert!(words.iter().all(|w| w.word != "s"));
        assert!(words.iter().any(|w| w.word == "nation"));
    }

    #[test]
    fn test_count_documents() {
        let counter = WordCounter::default();
        let docs = vec!["strike ends".to_string(), "strike begins".to_string()];
        let words = counter.count_documents(&docs);
        assert_eq!(words[0], WordCount { word: "strike".to_string(), count: 2 });
    }
}
