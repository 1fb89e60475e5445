use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, BankService, ProgressService, TopicOverview};
use testbank_core::model::TopicSlug;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://testbank.sqlite3";
const DEFAULT_BANK_DIR: &str = "banks";
const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTopic { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid --topic value: {raw}"),
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

struct DesktopApp {
    banks: Arc<BankService>,
    progress: Arc<ProgressService>,
    open_topic: Option<TopicSlug>,
}

impl UiApp for DesktopApp {
    fn open_topic_on_launch(&self) -> Option<TopicSlug> {
        self.open_topic.clone()
    }

    fn banks(&self) -> Arc<BankService> {
        Arc::clone(&self.banks)
    }

    fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

struct Args {
    db_url: String,
    bank_dir: PathBuf,
    topic: Option<TopicSlug>,
    json: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--bank-dir <dir>] [--topic <slug>]");
    eprintln!("  cargo run -p app -- list [--db <sqlite_url>] [--bank-dir <dir>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --bank-dir {DEFAULT_BANK_DIR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TESTBANK_DB_URL, TESTBANK_DIR, TESTBANK_TOPIC, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

fn parse_topic(raw: String) -> Result<TopicSlug, ArgsError> {
    TopicSlug::new(raw.clone()).map_err(|_| ArgsError::InvalidTopic { raw })
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("TESTBANK_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut bank_dir = std::env::var("TESTBANK_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_BANK_DIR), PathBuf::from);
        let mut topic = match std::env::var("TESTBANK_TOPIC") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_topic(raw)?),
            _ => None,
        };
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bank-dir" => {
                    bank_dir = PathBuf::from(require_value(args, "--bank-dir")?);
                }
                "--topic" if cmd == Command::Ui => {
                    topic = Some(parse_topic(require_value(args, "--topic")?)?);
                }
                "--json" if cmd == Command::List => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            bank_dir,
            topic,
            json,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_DB_URL || raw.starts_with("sqlite://") {
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn open_services(
    db_url: &str,
    bank_dir: PathBuf,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    if db_url == MEMORY_DB_URL {
        log::info!("using in-memory progress store");
        return Ok(AppServices::in_memory(bank_dir));
    }

    prepare_sqlite_file(db_url)?;
    let services = AppServices::new_sqlite(db_url, bank_dir).await?;
    log::info!("progress store ready at {db_url}");
    Ok(services)
}

fn score_column(row: &TopicOverview) -> String {
    match row.last_summary {
        Some(summary) if summary.is_complete() => {
            format!("{} / {}", summary.correct, summary.total)
        }
        Some(summary) => format!("{} / {} answered", summary.answered, summary.total),
        None => "-".to_string(),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = open_services(&parsed.db_url, parsed.bank_dir.clone()).await?;

    match cmd {
        Command::Ui => {
            log::info!("loading test banks from {}", parsed.bank_dir.display());
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                banks: services.banks(),
                progress: services.progress(),
                open_topic: parsed.topic,
            });

            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Test Bank")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::List => {
            let rows = services.banks().overview(&services.progress()).await?;
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("no test banks in {}", parsed.bank_dir.display());
                return Ok(());
            }
            for row in &rows {
                println!(
                    "{:<24} {:>4}  {:<32} {}",
                    row.topic.as_str(),
                    row.questions,
                    row.title,
                    score_column(row)
                );
            }
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
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

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
