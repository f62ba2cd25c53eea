use std::fmt;
use std::io::{self, BufRead, Write};

use lingo_core::{LEVEL_NODES, Language, LessonId, QuizKind};
use services::{
    Advance, ItemOutcome, LessonContentService, LessonSession, ProgressStore, SessionState,
    SpeechPlayback,
};
use storage::sqlite::SqliteKvStore;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessonId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid --lesson value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play   [--db <sqlite_url>] [--lesson <id>]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:lingoleap.sqlite3");
    eprintln!("  --lesson <current unlock frontier>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_DB_URL, LINGO_AI_API_KEY, LINGO_AI_BASE_URL, LINGO_AI_MODEL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Status,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "status" => Some(Self::Status),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    lesson_id: Option<LessonId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LINGO_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://lingoleap.sqlite3".into(), normalize_sqlite_url);
        let mut lesson_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--lesson" => {
                    let value = require_value(args, "--lesson")?;
                    let parsed = value
                        .parse::<LessonId>()
                        .map_err(|_| ArgsError::InvalidLessonId { raw: value.clone() })?;
                    lesson_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, lesson_id })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Terminal stand-in for browser speech synthesis: shows what would be voiced.
struct TerminalSpeech;

impl SpeechPlayback for TerminalSpeech {
    fn speak(&self, text: &str, language: Language) {
        println!("  🔊 ({}) {text}", language.speech_locale());
    }
}

fn read_line() -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end().to_string()))
}

fn print_status(store: &ProgressStore) {
    let progress = store.progress();
    println!(
        "{}  —  {} XP · {}🔥 · {}❤ · {}💎",
        progress.display_name,
        progress.experience,
        progress.streak_days,
        progress.hearts,
        progress.gems
    );
    println!(
        "Learning {} from {}",
        progress.target_language.name(),
        progress.native_language.name()
    );
    println!();
    for node in LEVEL_NODES {
        let id = LessonId::new(node.id);
        let marker = if store.is_completed(id) {
            "✔"
        } else if store.is_unlocked(id) {
            "·"
        } else {
            "🔒"
        };
        println!("  {marker} {} {} — {}", node.icon, node.id, node.topic);
    }
}

fn show_item(session: &LessonSession, store: &ProgressStore, speech: &dyn SpeechPlayback) {
    let Some(item) = session.current_item() else {
        return;
    };
    let target = store.progress().target_language;

    println!();
    println!(
        "[{}/{}]  ❤ {}",
        session.cursor() + 1,
        session.item_count(),
        store.progress().hearts
    );
    match item.kind() {
        QuizKind::MultipleChoice => {
            println!("Select the correct meaning");
            println!("  {}", item.prompt());
            if let Some(choices) = item.choices() {
                for (idx, choice) in choices.iter().enumerate() {
                    println!("  {}. {choice}", idx + 1);
                }
            }
        }
        QuizKind::TranslateToTarget | QuizKind::TranslateToNative => {
            println!("Translate this sentence");
            println!("  {}", item.prompt());
        }
        QuizKind::Listening => {
            println!("Type what you hear");
            speech.speak(item.spoken_text(), target);
        }
    }
}

/// Map a numeric reply onto a multiple-choice option; other input is taken
/// as the answer text itself.
fn resolve_reply(session: &LessonSession, reply: &str) -> String {
    let Some(item) = session.current_item() else {
        return reply.to_string();
    };
    if item.kind() == QuizKind::MultipleChoice {
        if let (Some(choices), Ok(n)) = (item.choices(), reply.trim().parse::<usize>()) {
            if n >= 1 && n <= choices.len() {
                return choices[n - 1].clone();
            }
        }
    }
    reply.to_string()
}

async fn play(
    store: &mut ProgressStore,
    lesson_id: Option<LessonId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let lesson_id =
        lesson_id.unwrap_or_else(|| LessonId::new(u64::from(store.progress().current_level)));

    if !store.is_unlocked(lesson_id) {
        println!(
            "Lesson {lesson_id} is still locked (frontier is {}).",
            store.progress().current_level
        );
        return Ok(());
    }
    if store.progress().hearts == 0 {
        println!("You are out of hearts. Run `reset` to start over.");
        return Ok(());
    }

    let speech = TerminalSpeech;
    let content = LessonContentService::gen_ai_from_env();
    let mut session = LessonSession::new(
        lesson_id,
        store.progress().target_language,
        store.progress().native_language,
    );

    println!("Creating your lesson...");
    session.start(&content).await;

    while session.state() == SessionState::Active {
        show_item(&session, store, &speech);

        let Some(reply) = read_line()? else {
            session.abort();
            break;
        };
        if matches!(reply.as_str(), "q" | "quit") {
            session.abort();
            break;
        }

        session.submit_response(resolve_reply(&session, &reply));
        if !session.can_grade() {
            println!("Type an answer first.");
            continue;
        }

        let correct_answer = session
            .current_item()
            .map(|item| item.correct_answer().to_string())
            .unwrap_or_default();
        match session.grade(store).await? {
            Some(ItemOutcome::Correct) => println!("  ✔ Nicely done!"),
            Some(ItemOutcome::Incorrect) => {
                println!("  ✘ Correct answer: {correct_answer}");
            }
            Some(ItemOutcome::Pending) | None => continue,
        }

        match session.advance(store).await? {
            Some(Advance::Completed { reward }) => {
                println!();
                println!(
                    "Lesson complete! +{reward} XP (total {}), level {}.",
                    store.progress().experience,
                    store.progress().current_level
                );
            }
            Some(Advance::Next) | None => {}
        }
    }

    if session.state() == SessionState::Aborted {
        println!("Lesson abandoned; progress unchanged.");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Status,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Status,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let kv = SqliteKvStore::open(&parsed.db_url).await?;
    let mut store = ProgressStore::load(kv).await?;

    match cmd {
        Command::Status => {
            print_status(&store);
            Ok(())
        }
        Command::Reset => {
            store.reset().await?;
            println!("Progress reset to the starting state.");
            print_status(&store);
            Ok(())
        }
        Command::Play => play(&mut store, parsed.lesson_id).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
