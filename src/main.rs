use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use quizdr::app::{App, AppScreen};
use quizdr::config::Config;
use quizdr::engine::evaluate::Response;
use quizdr::quiz::category::Category;
use quizdr::quiz::lesson::LessonKey;
use quizdr::quiz::problem::{Problem, ProblemKind};
use quizdr::source::ProblemSource;
use quizdr::source::dir::DirSource;
use quizdr::source::embedded::EmbeddedSource;
use quizdr::store::ProgressStore;
use quizdr::store::json_store::JsonStore;
use quizdr::store::schema::ExportData;

rust_i18n::i18n!("locales", fallback = "ja");

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Lesson-based language quiz")]
struct Cli {
    #[arg(short, long, help = "Category to open (grammar, vocabulary, text, debug)")]
    category: Option<Category>,

    #[arg(short, long, help = "Directory containing problem files")]
    data: Option<PathBuf>,

    #[arg(long, help = "Base URL to fetch problem files from")]
    url: Option<String>,

    #[arg(long, help = "Include the debug category")]
    debug: bool,

    #[arg(long, help = "Label language (ja, en)")]
    locale: Option<String>,

    #[arg(long, help = "Seed for problem shuffling")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play quizzes interactively (default)
    Play,
    /// List lessons with stored progress
    Lessons,
    /// Print stored progress as JSON
    Progress,
    /// Write progress and config to an export file
    Export { path: PathBuf },
    /// Replace stored progress with an export file
    Import { path: PathBuf },
    /// Save the effective settings (config file plus flags) as the config file
    SaveConfig,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("using default config: {e:#}");
        Config::default()
    });
    if let Some(category) = cli.category {
        config.default_category = category;
    }
    if let Some(dir) = &cli.data {
        config.problem_dir = Some(dir.to_string_lossy().to_string());
    }
    if cli.url.is_some() {
        config.problem_url = cli.url.clone();
    }
    if cli.debug {
        config.include_debug = true;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    config.normalize_locale();
    rust_i18n::set_locale(&config.locale);

    let store = JsonStore::with_base_dir(config.data_dir())?;
    if store.check_interrupted_import() {
        log::warn!("removed leftover backup from an interrupted import");
    }

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let rng = match cli.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let mut app = App::new(Box::new(store), config.default_category, rng);
            let source = problem_source(&config);
            app.load(source.as_ref(), config.include_debug);
            let stdin = io::stdin();
            run_app(
                &mut app,
                source.as_ref(),
                config.include_debug,
                &mut stdin.lock(),
                &mut io::stdout(),
            )
        }
        Command::Lessons => {
            let source = problem_source(&config);
            let set = source.fetch_problem_set(config.include_debug)?;
            let progress = store.load_progress();
            for category in set.categories() {
                println!("{} ({category})", category.label());
                for key in set.lessons(category) {
                    let count = set.lesson_problems(category, &key).len();
                    let lesson = key.to_string();
                    println!(
                        "  {:<12} {:>3} problems  {:>3}%",
                        t!("screen.lesson", lesson = lesson),
                        count,
                        progress.percentage(category, &key)
                    );
                }
            }
            Ok(())
        }
        Command::Progress => {
            println!("{}", serde_json::to_string_pretty(&store.load_progress())?);
            Ok(())
        }
        Command::Export { path } => {
            let export = store.export_all(&config);
            fs::write(&path, serde_json::to_string_pretty(&export)?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("exported progress to {}", path.display());
            Ok(())
        }
        Command::Import { path } => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let export: ExportData = serde_json::from_str(&json)?;
            store.import_all(&export)?;
            println!("imported progress from {}", path.display());
            Ok(())
        }
        Command::SaveConfig => {
            config.save()?;
            println!("saved config to {}", Config::config_path().display());
            Ok(())
        }
    }
}

fn problem_source(config: &Config) -> Box<dyn ProblemSource> {
    if let Some(source) = http_source(config) {
        return source;
    }
    match &config.problem_dir {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(EmbeddedSource),
    }
}

#[cfg(feature = "network")]
fn http_source(config: &Config) -> Option<Box<dyn ProblemSource>> {
    let url = config.problem_url.as_ref()?;
    Some(Box::new(quizdr::source::http::HttpSource::new(url.clone())))
}

#[cfg(not(feature = "network"))]
fn http_source(config: &Config) -> Option<Box<dyn ProblemSource>> {
    if config.problem_url.is_some() {
        log::warn!("problem_url is set but quizdr was built without the network feature");
    }
    None
}

fn run_app(
    app: &mut App,
    source: &dyn ProblemSource,
    include_debug: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        render(app, out)?;
        out.flush()?;

        if app.screen() == AppScreen::Quiz
            && !app.session().is_some_and(|s| s.is_answered())
            && let Some(ProblemKind::FormQuiz { sub_questions }) =
                app.current_problem().map(|p| p.kind.clone())
        {
            let mut fields = Vec::with_capacity(sub_questions.len());
            for sq in &sub_questions {
                write!(out, "  {}: ", sq.label)?;
                out.flush()?;
                let Some(line) = read_line(input)? else {
                    return Ok(());
                };
                if line.trim() == ":q" {
                    app.quit();
                    break;
                }
                fields.push(line);
            }
            if app.screen() == AppScreen::Quiz {
                app.submit_answer(&Response::Fields(fields));
            }
            continue;
        }

        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        if app.screen() == AppScreen::Error && line.trim() == "r" {
            app.reload();
            app.load(source, include_debug);
            continue;
        }
        if !handle_line(app, line.trim()) {
            return Ok(());
        }
    }
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Apply one line of input. Returns false when the user asked to exit.
fn handle_line(app: &mut App, line: &str) -> bool {
    match app.screen() {
        AppScreen::Loading | AppScreen::Error => line != "q",
        AppScreen::Start => handle_start_line(app, line),
        AppScreen::Quiz => handle_quiz_line(app, line),
        AppScreen::Result => handle_result_line(app, line),
    }
}

fn handle_start_line(app: &mut App, line: &str) -> bool {
    if line == "q" {
        return false;
    }
    if let Ok(category) = line.parse::<Category>() {
        app.select_category(category);
    } else if !line.is_empty() {
        app.select_lesson(LessonKey::from(line));
    }
    true
}

fn handle_quiz_line(app: &mut App, line: &str) -> bool {
    if line == ":q" {
        app.quit();
        return true;
    }
    if app.session().is_some_and(|s| s.is_answered()) {
        app.request_next();
        return true;
    }
    let Some(problem) = app.current_problem().cloned() else {
        return true;
    };
    match &problem.kind {
        ProblemKind::MultipleChoice { options, .. } => {
            let choice = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i))
                .cloned()
                .unwrap_or_else(|| line.to_string());
            app.submit_answer(&Response::Text(choice));
        }
        ProblemKind::Scramble { .. } => handle_scramble_line(app, line),
        _ => {
            app.submit_answer(&Response::text(line));
        }
    }
    true
}

/// Scramble input: slot numbers or words pick, `-` undoes, `!` clears and an
/// empty line submits.
fn handle_scramble_line(app: &mut App, line: &str) {
    if line.is_empty() {
        app.submit_scramble();
        return;
    }
    let Some(bank) = app.scramble_mut() else {
        return;
    };
    for token in line.split_whitespace() {
        match token {
            "-" => {
                bank.undo();
            }
            "!" => bank.clear(),
            _ => {
                let picked = match token.parse::<usize>() {
                    Ok(n) if n >= 1 => bank.pick(n - 1),
                    _ => bank.pick_word(token),
                };
                if !picked {
                    log::debug!("could not pick {token:?}");
                }
            }
        }
    }
}

fn handle_result_line(app: &mut App, line: &str) -> bool {
    match line {
        "r" => {
            app.retry();
        }
        "m" => {
            app.retry_incorrect();
        }
        "h" | "" => {
            app.back_to_home();
        }
        "q" => return false,
        _ => {}
    }
    true
}

fn render(app: &App, out: &mut impl Write) -> Result<()> {
    match app.screen() {
        AppScreen::Loading => writeln!(out, "{}", t!("screen.loading"))?,
        AppScreen::Error => {
            writeln!(out, "{}", t!("screen.error"))?;
            if let Some(err) = app.load_error() {
                writeln!(out, "  {err}")?;
            }
            write!(out, "[r] reload  [q] exit > ")?;
        }
        AppScreen::Start => render_start(app, out)?,
        AppScreen::Quiz => render_quiz(app, out)?,
        AppScreen::Result => render_result(app, out)?,
    }
    Ok(())
}

fn render_start(app: &App, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n== {} ==", t!("screen.title"))?;
    let tabs: Vec<String> = app
        .categories()
        .into_iter()
        .map(|c| {
            if c == app.category() {
                format!("[{}]", c.label())
            } else {
                format!(" {} ", c.label())
            }
        })
        .collect();
    writeln!(out, "{}", tabs.join(" "))?;

    let lessons = app.lessons();
    if lessons.is_empty() {
        writeln!(out, "{}", t!("screen.no_lessons"))?;
    } else {
        writeln!(out, "{}", t!("screen.choose_lesson"))?;
        for summary in &lessons {
            let lesson = summary.key.to_string();
            writeln!(
                out,
                "  {:<12} {:>3}%",
                t!("screen.lesson", lesson = lesson),
                summary.percentage()
            )?;
        }
    }
    write!(out, "> ")?;
    Ok(())
}

fn render_quiz(app: &App, out: &mut impl Write) -> Result<()> {
    let (Some(session), Some(problem)) = (app.session(), app.current_problem()) else {
        return Ok(());
    };
    let current = session.index() + 1;
    let total = session.total();
    writeln!(
        out,
        "\n{}  {}",
        problem.topic,
        t!("screen.progress", current = current, total = total)
    )?;
    writeln!(out, "{}", problem.question)?;

    if let Some(feedback) = session.feedback() {
        render_feedback(app, problem, out)?;
        writeln!(out, "{}", feedback.message)?;
        write!(out, "[enter] ")?;
        return Ok(());
    }

    match &problem.kind {
        ProblemKind::MultipleChoice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                writeln!(out, "  {}. {option}", i + 1)?;
            }
            write!(out, "> ")?;
        }
        ProblemKind::Scramble { .. } => {
            if let Some(bank) = app.scramble() {
                let words: Vec<String> = bank
                    .bank
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        if bank.is_used(i) {
                            format!("({})", "_".repeat(w.chars().count()))
                        } else {
                            format!("{}:{w}", i + 1)
                        }
                    })
                    .collect();
                writeln!(out, "  {}", words.join("  "))?;
                writeln!(out, "  » {}", bank.answer())?;
            }
            write!(out, "> ")?;
        }
        ProblemKind::FormQuiz { .. } => {}
        ProblemKind::FillInTheBlank { .. } => write!(out, "> ")?,
    }
    Ok(())
}

fn render_feedback(app: &App, problem: &Problem, out: &mut impl Write) -> Result<()> {
    let Some(evaluation) = app.session().and_then(|s| s.last_evaluation()) else {
        return Ok(());
    };
    if let ProblemKind::FormQuiz { sub_questions } = &problem.kind {
        for ((sq, given), ok) in sub_questions
            .iter()
            .zip(evaluation.user_answer.as_fields())
            .zip(&evaluation.field_results)
        {
            let mark = if *ok { "o" } else { "x" };
            if *ok {
                writeln!(out, "  {mark} {}: {given}", sq.label)?;
            } else {
                writeln!(
                    out,
                    "  {mark} {}: {given}  ({}: {})",
                    sq.label,
                    t!("review.correct_answer"),
                    sq.answer
                )?;
            }
        }
    }
    Ok(())
}

fn render_result(app: &App, out: &mut impl Write) -> Result<()> {
    let Some(result) = app.result() else {
        return Ok(());
    };
    writeln!(out, "\n== {} ==", t!("screen.finished"))?;
    let lesson = result.lesson.to_string();
    writeln!(
        out,
        "{} ({})",
        t!("screen.lesson", lesson = lesson),
        result.category.label()
    )?;
    writeln!(
        out,
        "{}: {} / {}",
        t!("screen.score"),
        result.score,
        result.total
    )?;
    let percentage = result.percentage;
    writeln!(out, "{}", t!("screen.accuracy", percentage = percentage))?;

    if result.can_review() {
        writeln!(out, "\n{}", t!("review.title"))?;
        for entry in &result.review {
            writeln!(out, "- {}", entry.question)?;
            for line in &entry.lines {
                match &line.label {
                    Some(label) => writeln!(
                        out,
                        "    {label}: {} -> {}",
                        line.given_display(),
                        line.expected
                    )?,
                    None => {
                        writeln!(out, "    {}: {}", t!("review.your_answer"), line.given_display())?;
                        writeln!(out, "    {}: {}", t!("review.correct_answer"), line.expected)?;
                    }
                }
            }
        }
        write!(out, "\n[r] retry  [m] missed only  [h] home  [q] exit > ")?;
    } else {
        write!(out, "\n[r] retry  [h] home  [q] exit > ")?;
    }
    Ok(())
}
