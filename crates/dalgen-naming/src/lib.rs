//! dalgen naming engine
//!
//! Turns raw database identifiers (`CustomerID`, `currentemployeerecord`,
//! `order_line-item`) into validated word sequences that can be rendered in
//! every casing convention the generators need.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dalgen_naming::Naming;
//!
//! let naming = Naming::load("dictionary.txt", "bigworddictionary.txt")?;
//! let name = naming.string_to_name("currentemployeerecord")?;
//! assert_eq!(name.pascal(), "CurrentEmployeeRecord");
//! assert_eq!(name.snake(), "current_employee_record");
//! ```
//!
//! Dictionaries are loaded once and are read-only afterwards; a `Naming`
//! can be shared freely between threads.

pub mod case;
pub mod dictionary;
pub mod name;
pub mod tokenizer;

pub use case::Case;
pub use dictionary::{WordSet, WordSource};
pub use name::{Name, Renderings};
pub use tokenizer::Tokenizer;

use std::path::Path;

/// Errors raised while loading dictionaries or naming identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// A dictionary file is missing or unreadable
    #[error("Configuration error: cannot read dictionary {path}: {message}")]
    Configuration { path: String, message: String },

    /// A lowercase run has no segmentation under the loaded dictionaries
    #[error("Cannot split '{run}' of identifier '{identifier}' into dictionary words")]
    Unsegmentable { identifier: String, run: String },
}

/// Anything able to turn raw identifier strings into [`Name`]s.
///
/// The document deserializer receives one of these as its context so that
/// entity names are rebuilt through the same dictionaries that produced them.
pub trait NameSource {
    /// Tokenize `raw` and wrap it as a [`Name`]
    fn string_to_name(&self, raw: &str) -> Result<Name, NamingError>;
}

/// The naming engine: primary and supplementary dictionaries plus tokenizer
#[derive(Debug, Clone)]
pub struct Naming {
    tokenizer: Tokenizer,
}

impl Naming {
    /// Load both dictionaries from disk
    pub fn load(
        primary: impl AsRef<Path>,
        supplementary: impl AsRef<Path>,
    ) -> Result<Self, NamingError> {
        let primary = WordSet::load(primary)?;
        let supplementary = WordSet::load(supplementary)?;
        Ok(Self::new(primary, supplementary))
    }

    /// Build an engine from already loaded word sets
    pub fn new(primary: WordSet, supplementary: WordSet) -> Self {
        Self {
            tokenizer: Tokenizer::new(primary, supplementary),
        }
    }

    /// Access the underlying tokenizer
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenize `raw` and wrap it as a [`Name`]
    pub fn string_to_name(&self, raw: &str) -> Result<Name, NamingError> {
        let tokens = self.tokenizer.tokenize(raw)?;
        Ok(Name::from_parts(raw, tokens))
    }
}

impl NameSource for Naming {
    fn string_to_name(&self, raw: &str) -> Result<Name, NamingError> {
        Naming::string_to_name(self, raw)
    }
}
