//! Canonical identifier names

use crate::case::Case;
use serde::Serialize;
use std::fmt;

/// A raw identifier together with its word tokens
///
/// Tokens are lowercase and never empty. Concatenated, they reproduce the raw
/// identifier with its delimiters (space, `_`, `-`) removed, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    raw: String,
    tokens: Vec<String>,
}

impl Name {
    /// Build a name from explicit tokens
    ///
    /// Returns `None` when the tokens do not spell out `raw`.
    pub fn new(raw: impl Into<String>, tokens: Vec<String>) -> Option<Self> {
        let raw = raw.into();
        let tokens: Vec<String> = tokens.into_iter().map(|t| t.to_lowercase()).collect();

        if tokens.iter().any(String::is_empty) || tokens.concat() != squash(&raw) {
            return None;
        }

        Some(Self { raw, tokens })
    }

    pub(crate) fn from_parts(raw: &str, tokens: Vec<String>) -> Self {
        Self {
            raw: raw.to_string(),
            tokens,
        }
    }

    /// The identifier as it was supplied
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lowercase word tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Render in the given convention
    pub fn render(&self, case: Case) -> String {
        case.render(&self.tokens)
    }

    pub fn lower(&self) -> String {
        self.render(Case::Lower)
    }

    pub fn upper(&self) -> String {
        self.render(Case::Upper)
    }

    pub fn pascal(&self) -> String {
        self.render(Case::Pascal)
    }

    pub fn camel(&self) -> String {
        self.render(Case::Camel)
    }

    pub fn snake(&self) -> String {
        self.render(Case::Snake)
    }

    pub fn upper_snake(&self) -> String {
        self.render(Case::UpperSnake)
    }

    /// All six renderings at once
    pub fn renderings(&self) -> Renderings {
        Renderings {
            raw: self.raw.clone(),
            lower: self.lower(),
            upper: self.upper(),
            pascal: self.pascal(),
            camel: self.camel(),
            snake: self.snake(),
            upper_snake: self.upper_snake(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Every rendering of a [`Name`], for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Renderings {
    pub raw: String,
    pub lower: String,
    pub upper: String,
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    pub upper_snake: String,
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
