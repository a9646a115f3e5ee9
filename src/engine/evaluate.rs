use crate::quiz::problem::{Problem, ProblemKind};

/// What the user submitted for one problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// A single typed or chosen answer.
    Text(String),
    /// One entry per form field, or the ordered word picks of a scramble.
    Fields(Vec<String>),
}

impl Response {
    pub fn text(s: impl Into<String>) -> Self {
        Response::Text(s.into())
    }

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Response::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// The response collapsed to one string; fields are joined with a space.
    fn joined(&self) -> String {
        match self {
            Response::Text(s) => s.clone(),
            Response::Fields(fields) => fields.join(" "),
        }
    }

    /// The response spread over `n` fields, padded with empty strings.
    fn spread(&self, n: usize) -> Vec<String> {
        let mut fields = match self {
            Response::Text(s) => vec![s.clone()],
            Response::Fields(fields) => fields.clone(),
        };
        fields.resize(n, String::new());
        fields
    }
}

/// The user's answer as retained for feedback and review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAnswer {
    Single(String),
    Fields(Vec<String>),
}

impl UserAnswer {
    pub fn as_fields(&self) -> &[String] {
        match self {
            UserAnswer::Fields(fields) => fields,
            UserAnswer::Single(_) => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    pub user_answer: UserAnswer,
    /// Per-field correctness for form quizzes; a single entry otherwise.
    pub field_results: Vec<bool>,
}

/// Case-insensitive comparison ignoring leading and trailing whitespace.
pub fn loose_eq(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Case-sensitive comparison ignoring leading and trailing whitespace.
pub fn exact_eq(given: &str, expected: &str) -> bool {
    given.trim() == expected.trim()
}

pub fn evaluate(problem: &Problem, response: &Response) -> Evaluation {
    match &problem.kind {
        ProblemKind::MultipleChoice { answer, .. } | ProblemKind::FillInTheBlank { answer } => {
            let given = response.joined();
            let correct = loose_eq(&given, answer);
            Evaluation {
                correct,
                user_answer: UserAnswer::Single(given),
                field_results: vec![correct],
            }
        }
        ProblemKind::Scramble { answer, .. } => {
            let given = response.joined();
            let correct = exact_eq(&given, answer);
            Evaluation {
                correct,
                user_answer: UserAnswer::Single(given),
                field_results: vec![correct],
            }
        }
        ProblemKind::FormQuiz { sub_questions } => {
            let given: Vec<String> = response
                .spread(sub_questions.len())
                .into_iter()
                .map(|field| field.trim().to_string())
                .collect();
            let field_results: Vec<bool> = sub_questions
                .iter()
                .zip(&given)
                .map(|(sq, field)| loose_eq(field, &sq.answer))
                .collect();
            Evaluation {
                correct: field_results.iter().all(|&ok| ok),
                user_answer: UserAnswer::Fields(given),
                field_results,
            }
        }
    }
}
