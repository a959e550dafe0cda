//! Word lists used to validate identifier segmentation

use crate::NamingError;
use std::collections::HashSet;
use std::path::Path;

/// Which dictionary a word was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordSource {
    /// The general purpose word list
    Primary,

    /// Additional, usually longer, domain words
    Supplementary,
}

/// An immutable set of lowercase words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: HashSet<String>,

    /// Length (in bytes) of the longest word, bounds candidate prefixes
    longest: usize,
}

impl WordSet {
    /// Load a newline-delimited word list
    ///
    /// Words are trimmed and lowercased; blank lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NamingError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| NamingError::Configuration {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let set = Self::from_words(contents.lines());
        tracing::info!(path = %path.display(), words = set.len(), "loaded dictionary");
        Ok(set)
    }

    /// Build a word set from an iterator of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let longest = words.iter().map(String::len).max().unwrap_or(0);

        Self { words, longest }
    }

    /// Membership test (expects a lowercase word)
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the set holds no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length of the longest word in the set
    pub fn longest(&self) -> usize {
        self.longest
    }
}
