use rust_i18n::t;

use crate::engine::evaluate::{self, Evaluation, Response, UserAnswer};
use crate::quiz::lesson::LessonLabel;
use crate::quiz::problem::{Problem, ProblemKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
}

impl Feedback {
    fn for_evaluation(problem: &Problem, evaluation: &Evaluation) -> Self {
        let message = if evaluation.correct {
            t!("feedback.correct").to_string()
        } else {
            match (&problem.kind, problem.answer()) {
                (ProblemKind::FormQuiz { .. }, _) | (_, None) => {
                    t!("feedback.incorrect_fields").to_string()
                }
                (_, Some(answer)) => t!("feedback.incorrect", answer = answer).to_string(),
            }
        };
        Self {
            correct: evaluation.correct,
            message,
        }
    }
}

/// A problem answered incorrectly, with what the user gave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncorrectRecord {
    pub problem: Problem,
    pub user_answer: UserAnswer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the next problem.
    Next,
    /// The last problem was answered; the session is complete.
    Finished,
}

/// One run through an ordered list of problems.
///
/// `score` and `incorrect` only ever grow through [`QuizSession::submit`],
/// and each problem is scored at most once.
#[derive(Clone, Debug)]
pub struct QuizSession {
    label: LessonLabel,
    problems: Vec<Problem>,
    index: usize,
    score: u32,
    incorrect: Vec<IncorrectRecord>,
    answered: bool,
    feedback: Option<Feedback>,
    last_evaluation: Option<Evaluation>,
}

impl QuizSession {
    pub fn new(label: LessonLabel, problems: Vec<Problem>) -> Self {
        Self {
            label,
            problems,
            index: 0,
            score: 0,
            incorrect: Vec::new(),
            answered: false,
            feedback: None,
            last_evaluation: None,
        }
    }

    pub fn label(&self) -> &LessonLabel {
        &self.label
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn total(&self) -> usize {
        self.problems.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn incorrect(&self) -> &[IncorrectRecord] {
        &self.incorrect
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Evaluation of the current problem, while its feedback is showing.
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    pub fn current(&self) -> Option<&Problem> {
        self.problems.get(self.index)
    }

    /// Problems scored so far, including the current one once answered.
    pub fn answered_count(&self) -> usize {
        self.index + usize::from(self.answered)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.problems.len()
    }

    /// Score the current problem. Returns `None` without touching the score
    /// if it was already answered or there is no current problem.
    pub fn submit(&mut self, response: &Response) -> Option<&Evaluation> {
        if self.answered {
            return None;
        }
        let problem = self.problems.get(self.index)?;
        let evaluation = evaluate::evaluate(problem, response);

        if evaluation.correct {
            self.score += 1;
        } else {
            self.incorrect.push(IncorrectRecord {
                problem: problem.clone(),
                user_answer: evaluation.user_answer.clone(),
            });
        }
        self.feedback = Some(Feedback::for_evaluation(problem, &evaluation));
        self.answered = true;
        self.last_evaluation = Some(evaluation);
        self.last_evaluation.as_ref()
    }

    /// Move past an answered problem. Returns `None` if the current problem
    /// has not been answered yet.
    pub fn advance(&mut self) -> Option<Advance> {
        if !self.answered {
            return None;
        }
        if self.index + 1 < self.problems.len() {
            self.index += 1;
            self.answered = false;
            self.feedback = None;
            self.last_evaluation = None;
            Some(Advance::Next)
        } else {
            Some(Advance::Finished)
        }
    }

    /// Problems answered incorrectly, in the order they were missed.
    pub fn missed_problems(&self) -> Vec<Problem> {
        self.incorrect.iter().map(|r| r.problem.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::lesson::LessonKey;
    use crate::quiz::problem::SubQuestion;

    fn fill(answer: &str) -> Problem {
        Problem {
            lesson: LessonKey::Number(1),
            topic: "t".to_string(),
            question: format!("answer is {answer}"),
            kind: ProblemKind::FillInTheBlank {
                answer: answer.to_string(),
            },
        }
    }

    fn session(answers: &[&str]) -> QuizSession {
        QuizSession::new(
            LessonLabel::Lesson(LessonKey::Number(1)),
            answers.iter().map(|a| fill(a)).collect(),
        )
    }

    fn assert_bounds(s: &QuizSession) {
        assert!(s.score() as usize <= s.answered_count());
        assert!(s.answered_count() <= s.total());
        assert!(s.index() <= s.total());
    }

    #[test]
    fn test_new_session() {
        let s = session(&["a", "b"]);
        assert_eq!(s.index(), 0);
        assert_eq!(s.score(), 0);
        assert!(!s.is_answered());
        assert!(s.feedback().is_none());
        assert_eq!(s.current().and_then(Problem::answer), Some("a"));
    }

    #[test]
    fn test_resubmit_does_not_double_score() {
        let mut s = session(&["a", "b"]);
        assert!(s.submit(&Response::text("a")).is_some());
        assert!(s.submit(&Response::text("a")).is_none());
        assert_eq!(s.score(), 1);

        let mut s = session(&["a", "b"]);
        s.submit(&Response::text("x"));
        s.submit(&Response::text("x"));
        assert_eq!(s.incorrect().len(), 1);
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut s = session(&["a", "b"]);
        assert_eq!(s.advance(), None);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_walk_through_session() {
        let mut s = session(&["a", "b", "c"]);
        assert_bounds(&s);

        s.submit(&Response::text("A"));
        assert_bounds(&s);
        assert!(s.feedback().is_some_and(|f| f.correct));
        assert_eq!(s.advance(), Some(Advance::Next));
        assert!(!s.is_answered());
        assert!(s.feedback().is_none());
        assert!(s.last_evaluation().is_none());

        s.submit(&Response::text("wrong"));
        assert_bounds(&s);
        let feedback = s.feedback().unwrap();
        assert!(!feedback.correct);
        assert!(feedback.message.contains('b'));
        assert_eq!(s.advance(), Some(Advance::Next));

        s.submit(&Response::text("c"));
        assert!(s.is_last());
        assert_eq!(s.advance(), Some(Advance::Finished));
        assert_bounds(&s);
        assert_eq!(s.score(), 2);
        assert_eq!(s.incorrect().len(), 1);
        assert_eq!(s.incorrect()[0].user_answer, UserAnswer::Single("wrong".to_string()));
        assert_eq!(s.missed_problems(), vec![fill("b")]);
    }

    #[test]
    fn test_form_quiz_records_fields() {
        let problem = Problem {
            lesson: LessonKey::Number(2),
            topic: "être".to_string(),
            question: "Conjuguez".to_string(),
            kind: ProblemKind::FormQuiz {
                sub_questions: vec![
                    SubQuestion {
                        label: "je".to_string(),
                        answer: "suis".to_string(),
                    },
                    SubQuestion {
                        label: "tu".to_string(),
                        answer: "es".to_string(),
                    },
                ],
            },
        };
        let mut s = QuizSession::new(LessonLabel::Lesson(LessonKey::Number(2)), vec![problem]);
        let eval = s.submit(&Response::fields(["suis", "est"])).cloned().unwrap();
        assert!(!eval.correct);
        assert_eq!(eval.field_results, vec![true, false]);
        assert_eq!(s.incorrect().len(), 1);
        assert_eq!(s.incorrect()[0].user_answer.as_fields(), ["suis", "est"]);
    }

    #[test]
    fn test_empty_session_has_no_current_problem() {
        let mut s = session(&[]);
        assert!(s.current().is_none());
        assert!(s.submit(&Response::text("a")).is_none());
        assert_eq!(s.score(), 0);
    }
}
