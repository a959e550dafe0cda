//! Identifier tokenizer
//!
//! An identifier is first cut on explicit delimiters (space, `_`, `-`) and on
//! casing transitions (`aB`, `a1`, `1a`). Any resulting segment that is not a
//! pure run of lowercase ASCII letters is kept as a single token. Lowercase
//! runs are split into dictionary words by greedy longest-prefix matching
//! with backtracking.

use crate::dictionary::{WordSet, WordSource};
use crate::NamingError;

const DELIMITERS: [char; 3] = [' ', '_', '-'];

/// Splits raw identifiers into lowercase word tokens
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    primary: WordSet,
    supplementary: WordSet,
}

impl Tokenizer {
    /// Create a tokenizer over a primary and a supplementary dictionary
    pub fn new(primary: WordSet, supplementary: WordSet) -> Self {
        Self {
            primary,
            supplementary,
        }
    }

    /// The primary dictionary
    pub fn primary(&self) -> &WordSet {
        &self.primary
    }

    /// The supplementary dictionary
    pub fn supplementary(&self) -> &WordSet {
        &self.supplementary
    }

    /// Find which dictionary knows `word`, supplementary first
    pub fn lookup(&self, word: &str) -> Option<WordSource> {
        if self.supplementary.contains(word) {
            Some(WordSource::Supplementary)
        } else if self.primary.contains(word) {
            Some(WordSource::Primary)
        } else {
            None
        }
    }

    /// Split `raw` into lowercase tokens
    ///
    /// Fails with [`NamingError::Unsegmentable`] when a lowercase run cannot
    /// be covered entirely by dictionary words.
    pub fn tokenize(&self, raw: &str) -> Result<Vec<String>, NamingError> {
        let mut tokens = Vec::new();

        for segment in split_segments(raw) {
            if segment.len() > 1 && is_lowercase_run(segment) {
                let words = self
                    .segment(segment)
                    .ok_or_else(|| NamingError::Unsegmentable {
                        identifier: raw.to_string(),
                        run: segment.to_string(),
                    })?;
                tokens.extend(words);
            } else {
                tokens.push(segment.to_lowercase());
            }
        }

        tracing::debug!(raw, ?tokens, "tokenized identifier");
        Ok(tokens)
    }

    /// Split a lowercase ASCII run into dictionary words
    ///
    /// At each position the longest dictionary prefix is taken. On a dead
    /// end the most recent match is shrunk and the search resumes. Positions
    /// proven unsegmentable are remembered so each is explored once.
    fn segment(&self, run: &str) -> Option<Vec<String>> {
        let n = run.len();
        let longest = self.primary.longest().max(self.supplementary.longest());
        let mut dead = vec![false; n + 1];
        let mut matches: Vec<(usize, usize)> = Vec::new();
        let mut pos = 0;
        let mut limit = longest.min(n);

        loop {
            if pos == n {
                return Some(
                    matches
                        .iter()
                        .map(|&(start, len)| run[start..start + len].to_string())
                        .collect(),
                );
            }

            let found = (1..=limit)
                .rev()
                .find(|&len| !dead[pos + len] && self.lookup(&run[pos..pos + len]).is_some());

            match found {
                Some(len) => {
                    matches.push((pos, len));
                    pos += len;
                    limit = longest.min(n - pos);
                }
                None => {
                    dead[pos] = true;
                    let (start, len) = matches.pop()?;
                    pos = start;
                    limit = len - 1;
                }
            }
        }
    }
}

/// Cut `raw` on delimiters and casing transitions
fn split_segments(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;

    for (i, c) in raw.char_indices() {
        if DELIMITERS.contains(&c) {
            if let Some(s) = start.take() {
                segments.push(&raw[s..i]);
            }
            prev = None;
            continue;
        }

        if let (Some(s), Some(p)) = (start, prev) {
            if is_boundary(p, c) {
                segments.push(&raw[s..i]);
                start = Some(i);
            }
        }

        if start.is_none() {
            start = Some(i);
        }
        prev = Some(c);
    }

    if let Some(s) = start {
        segments.push(&raw[s..]);
    }

    segments
}

fn is_boundary(prev: char, cur: char) -> bool {
    (prev.is_lowercase() && cur.is_uppercase())
        || (prev.is_alphabetic() && cur.is_ascii_digit())
        || (prev.is_ascii_digit() && cur.is_alphabetic())
}

fn is_lowercase_run(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(primary: &[&str], supplementary: &[&str]) -> Tokenizer {
        Tokenizer::new(
            WordSet::from_words(primary.iter().copied()),
            WordSet::from_words(supplementary.iter().copied()),
        )
    }

    #[test]
    fn splits_on_delimiters_and_case() {
        assert_eq!(split_segments("order_line-item id"), vec!["order", "line", "item", "id"]);
        assert_eq!(split_segments("CustomerID"), vec!["Customer", "ID"]);
        assert_eq!(split_segments("address2line"), vec!["address", "2", "line"]);
        assert_eq!(split_segments("__x__"), vec!["x"]);
        assert!(split_segments("").is_empty());
        assert!(split_segments("_ -").is_empty());
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let t = tokenizer(&[], &[]);
        assert!(t.tokenize("").unwrap().is_empty());
    }

    #[test]
    fn verbatim_segments_bypass_dictionary() {
        let t = tokenizer(&[], &[]);
        assert_eq!(t.tokenize("Stephen").unwrap(), vec!["stephen"]);
        assert_eq!(t.tokenize("x").unwrap(), vec!["x"]);
        assert_eq!(t.tokenize("2024").unwrap(), vec!["2024"]);
        assert_eq!(t.tokenize("CustomerID").unwrap(), vec!["customer", "id"]);
    }

    #[test]
    fn greedy_longest_prefix() {
        let t = tokenizer(&["current", "cur", "rent", "employee", "record"], &[]);
        assert_eq!(
            t.tokenize("currentemployeerecord").unwrap(),
            vec!["current", "employee", "record"]
        );
    }

    #[test]
    fn backtracks_on_dead_end() {
        let t = tokenizer(&["ab", "abc", "cd"], &[]);
        assert_eq!(t.tokenize("abcd").unwrap(), vec!["ab", "cd"]);
    }

    #[test]
    fn backtracks_through_several_matches() {
        let t = tokenizer(&["abc", "ab", "de", "cdef"], &[]);
        assert_eq!(t.tokenize("abcdef").unwrap(), vec!["ab", "cdef"]);
    }

    #[test]
    fn supplementary_words_extend_primary() {
        let t = tokenizer(&["can", "interest", "rate"], &["scan", "rates"]);
        assert_eq!(
            t.tokenize("scaninterestrates").unwrap(),
            vec!["scan", "interest", "rates"]
        );
        assert_eq!(t.lookup("scan"), Some(WordSource::Supplementary));
        assert_eq!(t.lookup("can"), Some(WordSource::Primary));
        assert_eq!(t.lookup("zzz"), None);
    }

    #[test]
    fn supplementary_wins_lookup_ties() {
        let t = tokenizer(&["interest"], &["interest"]);
        assert_eq!(t.lookup("interest"), Some(WordSource::Supplementary));
    }

    #[test]
    fn unsegmentable_run_fails() {
        let t = tokenizer(&["can", "interest"], &[]);
        let err = t.tokenize("scaninterest").unwrap_err();
        assert_eq!(
            err,
            NamingError::Unsegmentable {
                identifier: "scaninterest".to_string(),
                run: "scaninterest".to_string(),
            }
        );
    }

    #[test]
    fn long_unsegmentable_run_terminates() {
        let t = tokenizer(&["a", "aa", "aaa", "aaaa"], &[]);
        let raw = format!("{}b", "a".repeat(200));
        assert!(t.tokenize(&raw).is_err());
    }
}
