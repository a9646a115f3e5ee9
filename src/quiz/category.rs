use std::fmt;
use std::str::FromStr;

use rust_i18n::t;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grammar,
    Vocabulary,
    Text,
    Debug,
}

/// Categories every problem source must provide.
pub const REQUIRED_CATEGORIES: [Category; 3] =
    [Category::Grammar, Category::Vocabulary, Category::Text];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Grammar => "grammar",
            Category::Vocabulary => "vocabulary",
            Category::Text => "text",
            Category::Debug => "debug",
        }
    }

    /// Name of the data file the category is served from.
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Grammar => "problems.json",
            Category::Vocabulary => "vocabulary.json",
            Category::Text => "text.json",
            Category::Debug => "debug.json",
        }
    }

    pub fn label(self) -> String {
        match self {
            Category::Grammar => t!("category.grammar").to_string(),
            Category::Vocabulary => t!("category.vocabulary").to_string(),
            Category::Text => t!("category.text").to_string(),
            Category::Debug => t!("category.debug").to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grammar" => Ok(Category::Grammar),
            "vocabulary" => Ok(Category::Vocabulary),
            "text" => Ok(Category::Text),
            "debug" => Ok(Category::Debug),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Grammar".parse::<Category>().unwrap(), Category::Grammar);
        assert_eq!(" text ".parse::<Category>().unwrap(), Category::Text);
        assert!("kanji".parse::<Category>().is_err());
    }

    #[test]
    fn grammar_is_served_from_problems_file() {
        assert_eq!(Category::Grammar.file_name(), "problems.json");
        assert_eq!(Category::Vocabulary.file_name(), "vocabulary.json");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Category::Vocabulary).unwrap();
        assert_eq!(json, "\"vocabulary\"");
    }
}
