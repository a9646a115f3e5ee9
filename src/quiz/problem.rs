use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::quiz::category::Category;
use crate::quiz::lesson::LessonKey;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub label: String,
    pub answer: String,
}

/// Answer payload of a problem. The `type` tag in the data selects exactly
/// one shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProblemKind {
    MultipleChoice {
        answer: String,
        #[serde(default)]
        options: Vec<String>,
    },
    FillInTheBlank {
        answer: String,
    },
    FormQuiz {
        sub_questions: Vec<SubQuestion>,
    },
    Scramble {
        answer: String,
        #[serde(default)]
        words: Vec<String>,
    },
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::MultipleChoice { .. } => "multiple-choice",
            ProblemKind::FillInTheBlank { .. } => "fill-in-the-blank",
            ProblemKind::FormQuiz { .. } => "form-quiz",
            ProblemKind::Scramble { .. } => "scramble",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub lesson: LessonKey,
    #[serde(default)]
    pub topic: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: ProblemKind,
}

impl Problem {
    /// Expected answer for single-answer problems; `None` for form quizzes.
    pub fn answer(&self) -> Option<&str> {
        match &self.kind {
            ProblemKind::MultipleChoice { answer, .. }
            | ProblemKind::FillInTheBlank { answer }
            | ProblemKind::Scramble { answer, .. } => Some(answer),
            ProblemKind::FormQuiz { .. } => None,
        }
    }

    pub fn sub_questions(&self) -> &[SubQuestion] {
        match &self.kind {
            ProblemKind::FormQuiz { sub_questions } => sub_questions,
            _ => &[],
        }
    }
}

/// All problems, grouped by category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemSet {
    categories: BTreeMap<Category, Vec<Problem>>,
}

impl ProblemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, problems: Vec<Problem>) {
        self.categories.insert(category, problems);
    }

    pub fn with_category(mut self, category: Category, problems: Vec<Problem>) -> Self {
        self.insert(category, problems);
        self
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.keys().copied().collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    pub fn problems(&self, category: Category) -> &[Problem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Problems of one lesson, in data order.
    pub fn lesson_problems(&self, category: Category, lesson: &LessonKey) -> Vec<Problem> {
        self.problems(category)
            .iter()
            .filter(|p| &p.lesson == lesson)
            .cloned()
            .collect()
    }

    /// Distinct lesson keys of a category, sorted.
    pub fn lessons(&self, category: Category) -> Vec<LessonKey> {
        let keys: BTreeSet<&LessonKey> = self.problems(category).iter().map(|p| &p.lesson).collect();
        keys.into_iter().cloned().collect()
    }
}
