use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::engine::evaluate::Response;
use crate::event::QuizEvent;
use crate::quiz::category::Category;
use crate::quiz::lesson::{LessonKey, LessonLabel};
use crate::quiz::problem::{Problem, ProblemKind, ProblemSet};
use crate::session::result::QuizResult;
use crate::session::scramble::ScrambleInput;
use crate::session::state::{Advance, QuizSession};
use crate::source::{DataLoadError, ProblemSource};
use crate::store::ProgressStore;
use crate::store::schema::{LessonProgress, ProgressData};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Loading,
    Start,
    Quiz,
    Result,
    Error,
}

/// One entry of the start screen's lesson grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonSummary {
    pub key: LessonKey,
    pub progress: Option<LessonProgress>,
}

impl LessonSummary {
    pub fn percentage(&self) -> u32 {
        self.progress.map_or(0, |p| p.percentage)
    }
}

/// Owns the active quiz session and drives it from presentation events.
///
/// Every event handler returns `true` when it changed state (and the screen
/// should be redrawn) and `false` when the event did not apply in the current
/// state, in which case nothing was touched.
pub struct App {
    screen: AppScreen,
    category: Category,
    problem_set: ProblemSet,
    progress: ProgressData,
    session: Option<QuizSession>,
    scramble: Option<ScrambleInput>,
    last_result: Option<QuizResult>,
    load_error: Option<String>,
    store: Box<dyn ProgressStore>,
    rng: SmallRng,
}

impl App {
    pub fn new(store: Box<dyn ProgressStore>, category: Category, rng: SmallRng) -> Self {
        Self {
            screen: AppScreen::Loading,
            category,
            problem_set: ProblemSet::default(),
            progress: ProgressData::default(),
            session: None,
            scramble: None,
            last_result: None,
            load_error: None,
            store,
            rng,
        }
    }

    // --- accessors ---

    pub fn screen(&self) -> AppScreen {
        self.screen
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn categories(&self) -> Vec<Category> {
        self.problem_set.categories()
    }

    pub fn problem_set(&self) -> &ProblemSet {
        &self.problem_set
    }

    pub fn progress(&self) -> &ProgressData {
        &self.progress
    }

    /// Lessons of the current category with their stored progress.
    pub fn lessons(&self) -> Vec<LessonSummary> {
        self.problem_set
            .lessons(self.category)
            .into_iter()
            .map(|key| LessonSummary {
                progress: self.progress.get(self.category, &key).copied(),
                key,
            })
            .collect()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.session.as_ref().and_then(QuizSession::current)
    }

    /// Word bank for the current problem, when it is a scramble.
    pub fn scramble(&self) -> Option<&ScrambleInput> {
        self.scramble.as_ref()
    }

    pub fn scramble_mut(&mut self) -> Option<&mut ScrambleInput> {
        if self.session.as_ref().is_some_and(QuizSession::is_answered) {
            return None;
        }
        self.scramble.as_mut()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.last_result.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // --- loading ---

    /// Fetch problem data from `source`. Only valid while loading.
    pub fn load(&mut self, source: &dyn ProblemSource, include_debug: bool) -> bool {
        if self.screen != AppScreen::Loading {
            return self.ignore("load");
        }
        match source.fetch_problem_set(include_debug) {
            Ok(set) => self.data_loaded(set),
            Err(e) => self.data_load_failed(&e),
        }
    }

    pub fn data_loaded(&mut self, problem_set: ProblemSet) -> bool {
        if self.screen != AppScreen::Loading {
            return self.ignore("data-loaded");
        }
        self.problem_set = problem_set;
        if !self.problem_set.contains(self.category) {
            self.category = Category::Grammar;
        }
        self.load_error = None;
        self.enter_start();
        true
    }

    pub fn data_load_failed(&mut self, error: &DataLoadError) -> bool {
        self.fail_loading(error.to_string())
    }

    fn fail_loading(&mut self, message: String) -> bool {
        if self.screen != AppScreen::Loading {
            return self.ignore("data-load-failed");
        }
        log::error!("problem data failed to load: {message}");
        self.load_error = Some(message);
        self.screen = AppScreen::Error;
        true
    }

    /// Go back to loading from any screen, dropping the active session.
    pub fn reload(&mut self) -> bool {
        self.session = None;
        self.scramble = None;
        self.last_result = None;
        self.screen = AppScreen::Loading;
        true
    }

    // --- start screen ---

    pub fn select_category(&mut self, category: Category) -> bool {
        if self.screen != AppScreen::Start || !self.problem_set.contains(category) {
            return self.ignore("category-selected");
        }
        self.category = category;
        true
    }

    /// Start a shuffled session over one lesson of the current category.
    /// A lesson with no problems is rejected and the start screen stays up.
    pub fn select_lesson(&mut self, lesson: LessonKey) -> bool {
        if self.screen != AppScreen::Start {
            return self.ignore("lesson-selected");
        }
        let problems = self.problem_set.lesson_problems(self.category, &lesson);
        if problems.is_empty() {
            log::warn!("lesson {lesson} of {} has no problems", self.category);
            return false;
        }
        self.start_session(LessonLabel::Lesson(lesson), problems);
        true
    }

    // --- quiz screen ---

    pub fn submit_answer(&mut self, response: &Response) -> bool {
        if self.screen != AppScreen::Quiz {
            return self.ignore("answer-submitted");
        }
        let Some(session) = self.session.as_mut() else {
            return self.ignore("answer-submitted");
        };
        match session.submit(response).map(|evaluation| evaluation.correct) {
            Some(correct) => {
                log::debug!(
                    "problem {}/{} answered, correct={correct}",
                    session.index() + 1,
                    session.total()
                );
                true
            }
            None => self.ignore("answer-submitted"),
        }
    }

    /// Submit the words picked so far in the scramble word bank.
    pub fn submit_scramble(&mut self) -> bool {
        match self.scramble.as_ref().map(ScrambleInput::to_response) {
            Some(response) => self.submit_answer(&response),
            None => self.ignore("answer-submitted"),
        }
    }

    pub fn request_next(&mut self) -> bool {
        if self.screen != AppScreen::Quiz {
            return self.ignore("next-requested");
        }
        let Some(advance) = self.session.as_mut().and_then(QuizSession::advance) else {
            return self.ignore("next-requested");
        };
        match advance {
            Advance::Next => self.prepare_scramble(),
            Advance::Finished => self.finish_session(),
        }
        true
    }

    /// Abandon the session without recording progress.
    pub fn quit(&mut self) -> bool {
        if self.screen != AppScreen::Quiz {
            return self.ignore("quit-requested");
        }
        log::info!("quiz abandoned");
        self.enter_start();
        true
    }

    // --- result screen ---

    /// Run the same lesson again with a fresh shuffle.
    pub fn retry(&mut self) -> bool {
        if self.screen != AppScreen::Result {
            return self.ignore("retry-selected");
        }
        let Some(label) = self.session.as_ref().map(|s| s.label().plain()) else {
            return self.ignore("retry-selected");
        };
        let problems = self.problem_set.lesson_problems(self.category, label.key());
        if problems.is_empty() {
            log::warn!("lesson {label} of {} has no problems", self.category);
            return false;
        }
        self.start_session(label, problems);
        true
    }

    /// Run a review session over the problems missed in the last session.
    pub fn retry_incorrect(&mut self) -> bool {
        if self.screen != AppScreen::Result {
            return self.ignore("retry-incorrect-selected");
        }
        let Some(session) = self.session.as_ref() else {
            return self.ignore("retry-incorrect-selected");
        };
        if session.incorrect().is_empty() {
            return self.ignore("retry-incorrect-selected");
        }
        let label = session.label().review();
        let problems = session.missed_problems();
        self.start_session(label, problems);
        true
    }

    pub fn back_to_home(&mut self) -> bool {
        if self.screen != AppScreen::Result {
            return self.ignore("back-to-home-requested");
        }
        self.enter_start();
        true
    }

    pub fn handle(&mut self, event: QuizEvent) -> bool {
        log::debug!("handling {}", event.name());
        match event {
            QuizEvent::DataLoaded(set) => self.data_loaded(set),
            QuizEvent::DataLoadFailed(message) => self.fail_loading(message),
            QuizEvent::CategorySelected(category) => self.select_category(category),
            QuizEvent::LessonSelected(lesson) => self.select_lesson(lesson),
            QuizEvent::AnswerSubmitted(response) => self.submit_answer(&response),
            QuizEvent::NextRequested => self.request_next(),
            QuizEvent::QuitRequested => self.quit(),
            QuizEvent::RetrySelected => self.retry(),
            QuizEvent::RetryIncorrectSelected => self.retry_incorrect(),
            QuizEvent::BackToHomeRequested => self.back_to_home(),
        }
    }

    // --- internals ---

    fn ignore(&self, event: &str) -> bool {
        log::debug!("ignoring {event} on {:?} screen", self.screen);
        false
    }

    fn enter_start(&mut self) {
        self.progress = self.store.load_progress();
        self.session = None;
        self.scramble = None;
        self.last_result = None;
        self.screen = AppScreen::Start;
    }

    fn start_session(&mut self, label: LessonLabel, mut problems: Vec<Problem>) {
        problems.shuffle(&mut self.rng);
        log::info!(
            "starting {} lesson {label} with {} problems",
            self.category,
            problems.len()
        );
        self.session = Some(QuizSession::new(label, problems));
        self.last_result = None;
        self.prepare_scramble();
        self.screen = AppScreen::Quiz;
    }

    fn prepare_scramble(&mut self) {
        self.scramble = match self.current_problem().map(|p| &p.kind) {
            Some(ProblemKind::Scramble { words, .. }) => {
                let words = words.clone();
                Some(ScrambleInput::new(&words, &mut self.rng))
            }
            _ => None,
        };
    }

    fn finish_session(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let result = QuizResult::from_session(self.category, session);
        self.persist_progress(&result);
        log::info!(
            "finished {} lesson {}: {}/{} ({}%)",
            result.category,
            result.lesson,
            result.score,
            result.total,
            result.percentage
        );
        self.scramble = None;
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    /// Record a completed session under its plain lesson key, replacing any
    /// earlier result for that lesson.
    fn persist_progress(&self, result: &QuizResult) {
        let mut data = self.store.load_progress();
        data.record(result.category, result.lesson.key(), result.score, result.total);
        if let Err(e) = self.store.save_progress(&data) {
            log::warn!("failed to save progress: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rand::SeedableRng;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn fill(lesson: u32, answer: &str) -> Problem {
        Problem {
            lesson: LessonKey::Number(lesson),
            topic: "t".to_string(),
            question: format!("q-{answer}"),
            kind: ProblemKind::FillInTheBlank {
                answer: answer.to_string(),
            },
        }
    }

    fn problem_set() -> ProblemSet {
        ProblemSet::new()
            .with_category(Category::Grammar, vec![fill(1, "a"), fill(1, "b"), fill(2, "c")])
            .with_category(Category::Vocabulary, vec![fill(1, "mot")])
            .with_category(Category::Text, vec![])
    }

    fn loaded_app() -> (Rc<MemoryStore>, App) {
        let store = Rc::new(MemoryStore::new());
        let mut app = App::new(
            Box::new(Rc::clone(&store)),
            Category::Grammar,
            SmallRng::seed_from_u64(42),
        );
        assert!(app.data_loaded(problem_set()));
        (store, app)
    }

    fn current_answer(app: &App) -> String {
        app.current_problem()
            .and_then(Problem::answer)
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_starts_loading_then_start() {
        let store = Rc::new(MemoryStore::new());
        let mut app = App::new(Box::new(store), Category::Grammar, SmallRng::seed_from_u64(1));
        assert_eq!(app.screen(), AppScreen::Loading);
        assert!(app.data_loaded(problem_set()));
        assert_eq!(app.screen(), AppScreen::Start);
        assert!(!app.data_loaded(problem_set()));
    }

    #[test]
    fn test_load_failure_shows_error_until_reload() {
        let store = Rc::new(MemoryStore::new());
        let mut app = App::new(Box::new(store), Category::Grammar, SmallRng::seed_from_u64(1));
        assert!(app.handle(QuizEvent::DataLoadFailed("boom".to_string())));
        assert_eq!(app.screen(), AppScreen::Error);
        assert_eq!(app.load_error(), Some("boom"));
        assert!(!app.select_lesson(LessonKey::Number(1)));

        assert!(app.reload());
        assert!(app.data_loaded(problem_set()));
        assert_eq!(app.screen(), AppScreen::Start);
        assert!(app.load_error().is_none());
    }

    #[test]
    fn test_category_selection_stays_on_start() {
        let (_store, mut app) = loaded_app();
        assert!(app.select_category(Category::Vocabulary));
        assert_eq!(app.screen(), AppScreen::Start);
        assert_eq!(app.category(), Category::Vocabulary);
        let keys: Vec<LessonKey> = app.lessons().into_iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![LessonKey::Number(1)]);
        assert!(!app.select_category(Category::Debug));
    }

    #[test]
    fn test_empty_lesson_is_rejected() {
        let (_store, mut app) = loaded_app();
        assert!(!app.select_lesson(LessonKey::Number(99)));
        assert_eq!(app.screen(), AppScreen::Start);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_select_lesson_builds_session() {
        let (_store, mut app) = loaded_app();
        assert!(app.select_lesson(LessonKey::Number(1)));
        assert_eq!(app.screen(), AppScreen::Quiz);
        let session = app.session().unwrap();
        assert_eq!(session.total(), 2);
        assert_eq!(session.index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.problems().iter().all(|p| p.lesson == LessonKey::Number(1)));
    }

    #[test]
    fn test_next_before_answer_is_ignored() {
        let (_store, mut app) = loaded_app();
        app.select_lesson(LessonKey::Number(1));
        assert!(!app.request_next());
        assert_eq!(app.session().unwrap().index(), 0);
    }

    #[test]
    fn test_quit_discards_without_saving() {
        let (store, mut app) = loaded_app();
        app.select_lesson(LessonKey::Number(2));
        let answer = current_answer(&app);
        app.submit_answer(&Response::text(answer));
        assert!(app.quit());
        assert_eq!(app.screen(), AppScreen::Start);
        assert!(app.session().is_none());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_completion_saves_and_home_reloads_progress() {
        let (store, mut app) = loaded_app();
        app.select_lesson(LessonKey::Number(2));
        app.submit_answer(&Response::text("C"));
        assert!(app.request_next());
        assert_eq!(app.screen(), AppScreen::Result);

        let saved = store.snapshot();
        assert_eq!(
            saved.get(Category::Grammar, &LessonKey::Number(2)),
            Some(&LessonProgress {
                score: 1,
                total: 1,
                percentage: 100
            })
        );
        assert!(!app.retry_incorrect());

        assert!(app.back_to_home());
        let lessons = app.lessons();
        assert_eq!(lessons[0].percentage(), 0);
        assert_eq!(lessons[1].percentage(), 100);
    }

    #[test]
    fn test_result_events_only_on_result_screen() {
        let (_store, mut app) = loaded_app();
        assert!(!app.retry());
        assert!(!app.retry_incorrect());
        assert!(!app.back_to_home());
        assert!(!app.quit());
        assert!(!app.submit_answer(&Response::text("a")));
    }

    #[test]
    fn test_retry_of_review_uses_plain_lesson() {
        let (_store, mut app) = loaded_app();
        app.select_lesson(LessonKey::Number(1));
        for _ in 0..2 {
            app.submit_answer(&Response::text("nope"));
            app.request_next();
        }
        assert!(app.retry_incorrect());
        assert_eq!(app.session().unwrap().label().to_string(), "1 (review)");
        assert_eq!(app.session().unwrap().total(), 2);

        app.submit_answer(&Response::text("nope"));
        app.request_next();
        app.submit_answer(&Response::text("nope"));
        app.request_next();
        assert_eq!(app.screen(), AppScreen::Result);

        assert!(app.retry_incorrect());
        assert_eq!(app.session().unwrap().label().to_string(), "1 (review)");

        app.submit_answer(&Response::text("nope"));
        app.request_next();
        app.submit_answer(&Response::text("nope"));
        app.request_next();
        assert!(app.retry());
        let session = app.session().unwrap();
        assert_eq!(session.label(), &LessonLabel::Lesson(LessonKey::Number(1)));
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn test_scramble_word_bank_follows_current_problem() {
        let scramble = Problem {
            lesson: LessonKey::Number(1),
            topic: String::new(),
            question: "order".to_string(),
            kind: ProblemKind::Scramble {
                answer: "je suis".to_string(),
                words: vec!["suis".to_string(), "je".to_string()],
            },
        };
        let set = ProblemSet::new()
            .with_category(Category::Grammar, vec![scramble])
            .with_category(Category::Vocabulary, vec![])
            .with_category(Category::Text, vec![]);
        let store = Rc::new(MemoryStore::new());
        let mut app = App::new(Box::new(store), Category::Grammar, SmallRng::seed_from_u64(9));
        app.data_loaded(set);
        app.select_lesson(LessonKey::Number(1));

        let bank = app.scramble_mut().unwrap();
        assert!(bank.pick_word("je"));
        assert!(bank.pick_word("suis"));
        assert!(app.submit_scramble());
        assert_eq!(app.session().unwrap().score(), 1);
        assert!(app.scramble_mut().is_none());
    }
}
