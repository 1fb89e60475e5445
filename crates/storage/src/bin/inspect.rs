use std::fmt;

use storage::repository::Storage;
use testbank_core::model::{PersistedSummary, SUMMARY_KEY_PREFIX, TopicSlug};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    topic: Option<TopicSlug>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopic { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("TESTBANK_DB_URL")
            .unwrap_or_else(|_| "sqlite://testbank.sqlite3".into());
        let mut topic = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(&mut args, "--db")?,
                "--topic" => {
                    let value = require_value(&mut args, "--topic")?;
                    let parsed = TopicSlug::new(value.clone())
                        .map_err(|_| ArgsError::InvalidTopic { raw: value })?;
                    topic = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, topic })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin inspect -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://testbank.sqlite3)");
    eprintln!("  --topic <slug>            Print only this topic's saved summary");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TESTBANK_DB_URL");
}

fn describe(raw: &str) -> String {
    match PersistedSummary::from_json(raw) {
        Ok(summary) => format!(
            "answered={} correct={} total={}",
            summary.answered, summary.correct, summary.total
        ),
        Err(_) => format!("unreadable record: {raw}"),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    if let Some(topic) = args.topic {
        let key = PersistedSummary::storage_key(&topic);
        match storage.kv.get_item(&key).await? {
            Some(raw) => println!("{topic}: {}", describe(&raw)),
            None => println!("{topic}: no saved summary ({key})"),
        }
        return Ok(());
    }

    let items = storage.kv.items_with_prefix(SUMMARY_KEY_PREFIX).await?;
    if items.is_empty() {
        println!("No saved summaries in {}", args.db_url);
    }
    for (key, raw) in items {
        let topic = TopicSlug::or_unknown(PersistedSummary::topic_from_key(&key));
        println!("{topic}: {}", describe(&raw));
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
