use chrono::{DateTime, Utc};
use rust_i18n::t;

use crate::engine::evaluate::{UserAnswer, loose_eq};
use crate::engine::scoring;
use crate::quiz::category::Category;
use crate::quiz::lesson::LessonLabel;
use crate::quiz::problem::ProblemKind;
use crate::session::state::{IncorrectRecord, QuizSession};

/// One answer line of a missed problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewLine {
    /// Field label for form quizzes.
    pub label: Option<String>,
    pub given: String,
    pub expected: String,
    pub correct: bool,
}

impl ReviewLine {
    /// What the user gave, or the "no response" label when they left it empty.
    pub fn given_display(&self) -> String {
        if self.given.is_empty() {
            t!("review.no_response").to_string()
        } else {
            self.given.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewEntry {
    pub question: String,
    pub lines: Vec<ReviewLine>,
}

impl ReviewEntry {
    pub fn from_record(record: &IncorrectRecord) -> Self {
        let problem = &record.problem;
        let lines = match (&problem.kind, &record.user_answer) {
            (ProblemKind::FormQuiz { sub_questions }, UserAnswer::Fields(given)) => sub_questions
                .iter()
                .enumerate()
                .map(|(i, sq)| {
                    let given = given.get(i).cloned().unwrap_or_default();
                    ReviewLine {
                        label: Some(sq.label.clone()),
                        correct: loose_eq(&given, &sq.answer),
                        given,
                        expected: sq.answer.clone(),
                    }
                })
                .collect(),
            (_, user_answer) => {
                let given = match user_answer {
                    UserAnswer::Single(s) => s.clone(),
                    UserAnswer::Fields(fields) => fields.join(" "),
                };
                vec![ReviewLine {
                    label: None,
                    given,
                    expected: problem.answer().unwrap_or_default().to_string(),
                    correct: false,
                }]
            }
        };
        Self {
            question: problem.question.clone(),
            lines,
        }
    }
}

/// Summary shown on the result screen.
#[derive(Clone, Debug)]
pub struct QuizResult {
    pub category: Category,
    pub lesson: LessonLabel,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub timestamp: DateTime<Utc>,
    pub review: Vec<ReviewEntry>,
}

impl QuizResult {
    pub fn from_session(category: Category, session: &QuizSession) -> Self {
        let total = session.total() as u32;
        Self {
            category,
            lesson: session.label().clone(),
            score: session.score(),
            total,
            percentage: scoring::percentage(session.score(), total),
            timestamp: Utc::now(),
            review: session.incorrect().iter().map(ReviewEntry::from_record).collect(),
        }
    }

    pub fn can_review(&self) -> bool {
        !self.review.is_empty()
    }
}
