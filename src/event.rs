use crate::engine::evaluate::Response;
use crate::quiz::category::Category;
use crate::quiz::lesson::LessonKey;
use crate::quiz::problem::ProblemSet;

/// Everything the presentation layer can ask of the quiz.
#[derive(Clone, Debug)]
pub enum QuizEvent {
    DataLoaded(ProblemSet),
    DataLoadFailed(String),
    CategorySelected(Category),
    LessonSelected(LessonKey),
    AnswerSubmitted(Response),
    NextRequested,
    QuitRequested,
    RetrySelected,
    RetryIncorrectSelected,
    BackToHomeRequested,
}

impl QuizEvent {
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::DataLoaded(_) => "data-loaded",
            QuizEvent::DataLoadFailed(_) => "data-load-failed",
            QuizEvent::CategorySelected(_) => "category-selected",
            QuizEvent::LessonSelected(_) => "lesson-selected",
            QuizEvent::AnswerSubmitted(_) => "answer-submitted",
            QuizEvent::NextRequested => "next-requested",
            QuizEvent::QuitRequested => "quit-requested",
            QuizEvent::RetrySelected => "retry-selected",
            QuizEvent::RetryIncorrectSelected => "retry-incorrect-selected",
            QuizEvent::BackToHomeRequested => "back-to-home-requested",
        }
    }
}
