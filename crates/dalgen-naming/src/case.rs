//! Casing conventions for token sequences

use std::fmt;

/// A code-casing convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    /// `currentemployeerecord`
    Lower,

    /// `CURRENTEMPLOYEERECORD`
    Upper,

    /// `CurrentEmployeeRecord`
    Pascal,

    /// `currentEmployeeRecord`
    Camel,

    /// `current_employee_record`
    Snake,

    /// `CURRENT_EMPLOYEE_RECORD`
    UpperSnake,
}

impl Case {
    /// Every convention, in display order
    pub const ALL: [Case; 6] = [
        Case::Lower,
        Case::Upper,
        Case::Pascal,
        Case::Camel,
        Case::Snake,
        Case::UpperSnake,
    ];

    /// Stable identifier for the convention
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Pascal => "pascal",
            Self::Camel => "camel",
            Self::Snake => "snake",
            Self::UpperSnake => "upper_snake",
        }
    }

    /// Render `tokens` in this convention
    pub fn render<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let words = tokens.iter().map(AsRef::as_ref);
        match self {
            Self::Lower => words.map(str::to_lowercase).collect(),
            Self::Upper => words.map(str::to_uppercase).collect(),
            Self::Pascal => words.map(capitalize).collect(),
            Self::Camel => words
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Self::Snake => words.map(str::to_lowercase).collect::<Vec<_>>().join("_"),
            Self::UpperSnake => words.map(str::to_uppercase).collect::<Vec<_>>().join("_"),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
