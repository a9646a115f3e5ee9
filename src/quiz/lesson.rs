use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Suffix marking a lesson label as a review of missed problems.
pub const REVIEW_MARKER: &str = "(review)";

/// Lesson identifier as it appears in the problem data: usually a number,
/// occasionally a name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonKey {
    Number(u32),
    Name(String),
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonKey::Number(n) => write!(f, "{n}"),
            LessonKey::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for LessonKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LessonKey::from(s))
    }
}

impl From<u32> for LessonKey {
    fn from(n: u32) -> Self {
        LessonKey::Number(n)
    }
}

impl From<&str> for LessonKey {
    fn from(s: &str) -> Self {
        let s = strip_review_marker(s);
        match s.parse::<u32>() {
            Ok(n) => LessonKey::Number(n),
            Err(_) => LessonKey::Name(s.to_string()),
        }
    }
}

/// Strip a trailing review marker (and the space before it), if present.
pub fn strip_review_marker(label: &str) -> &str {
    let trimmed = label.trim();
    match trimmed.strip_suffix(REVIEW_MARKER) {
        Some(rest) => rest.trim_end(),
        None => trimmed,
    }
}

/// Label of the lesson a session was built from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LessonLabel {
    Lesson(LessonKey),
    Review(LessonKey),
}

impl LessonLabel {
    /// The primitive lesson key, with any review marker removed.
    pub fn key(&self) -> &LessonKey {
        match self {
            LessonLabel::Lesson(key) | LessonLabel::Review(key) => key,
        }
    }

    /// Review label for the same lesson. Reviewing a review does not nest.
    pub fn review(&self) -> LessonLabel {
        LessonLabel::Review(self.key().clone())
    }

    /// Plain label for the same lesson.
    pub fn plain(&self) -> LessonLabel {
        LessonLabel::Lesson(self.key().clone())
    }

    pub fn is_review(&self) -> bool {
        matches!(self, LessonLabel::Review(_))
    }
}

impl From<LessonKey> for LessonLabel {
    fn from(key: LessonKey) -> Self {
        LessonLabel::Lesson(key)
    }
}

impl fmt::Display for LessonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonLabel::Lesson(key) => write!(f, "{key}"),
            LessonLabel::Review(key) => write!(f, "{key} {REVIEW_MARKER}"),
        }
    }
}

impl FromStr for LessonLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_review = s.trim().ends_with(REVIEW_MARKER);
        let key = LessonKey::from(s);
        Ok(if is_review {
            LessonLabel::Review(key)
        } else {
            LessonLabel::Lesson(key)
        })
    }
}
