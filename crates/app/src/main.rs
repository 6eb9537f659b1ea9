use std::fmt;
use std::sync::Arc;

use services::{AppServices, GameConfig, SilentAudio};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

const DEFAULT_DB_URL: &str = "sqlite://animal_quiz.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
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

fn parse_count(raw: String, flag: &'static str) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ArgsError::InvalidCount { flag, raw }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  animal-quiz [play]     [--db <sqlite_url>] [--memory] [--levels <n>] [--questions <n>]");
    eprintln!("  animal-quiz progress   [--db <sqlite_url>] [--levels <n>]");
    eprintln!("  animal-quiz reset      [--db <sqlite_url>] [--levels <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!(
        "  --levels {}  --questions {}",
        GameConfig::DEFAULT_TOTAL_LEVELS,
        GameConfig::DEFAULT_QUESTIONS_PER_LEVEL
    );
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ANIMAL_QUIZ_DB_URL, ANIMAL_QUIZ_LEVELS, ANIMAL_QUIZ_QUESTIONS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Progress,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "progress" => Some(Self::Progress),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    /// `None` keeps progress in memory only.
    db_url: Option<String>,
    total_levels: u32,
    questions_per_level: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = Some(
            std::env::var("ANIMAL_QUIZ_DB_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
        );
        let mut total_levels = env_count("ANIMAL_QUIZ_LEVELS", GameConfig::DEFAULT_TOTAL_LEVELS);
        let mut questions_per_level = env_count(
            "ANIMAL_QUIZ_QUESTIONS",
            GameConfig::DEFAULT_QUESTIONS_PER_LEVEL,
        );

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--memory" => db_url = None,
                "--levels" => {
                    total_levels = parse_count(require_value(args, "--levels")?, "--levels")?;
                }
                "--questions" => {
                    questions_per_level =
                        parse_count(require_value(args, "--questions")?, "--questions")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            total_levels,
            questions_per_level,
        })
    }

    /// Storage backend as shown in logs.
    fn backend(&self) -> &str {
        self.db_url.as_deref().unwrap_or("memory")
    }
}

fn env_count(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means play.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = GameConfig::new(parsed.total_levels, parsed.questions_per_level)?;
    info!(
        command = ?cmd,
        storage = parsed.backend(),
        levels = config.total_levels(),
        questions = config.questions_per_level(),
        "starting"
    );
    let player = Arc::new(SilentAudio::new());
    let services = match &parsed.db_url {
        Some(db_url) => {
            prepare_sqlite_file(db_url)?;
            AppServices::new_sqlite(db_url, config, player).await?
        }
        None => AppServices::in_memory(config, player),
    };

    match cmd {
        Command::Play => {
            let game = services.game().await;
            terminal::run(game).await?;
        }
        Command::Progress => {
            let levels = services.progress().load().await;
            terminal::render_map(&levels, &mut std::io::stdout())?;
        }
        Command::Reset => {
            let levels = services.progress().reset().await?;
            info!(levels = levels.len(), "progress reset");
            terminal::render_map(&levels, &mut std::io::stdout())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
