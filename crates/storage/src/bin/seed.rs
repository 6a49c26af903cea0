use std::fmt;

use chrono::{DateTime, Utc};
use storage::repository::InMemoryRepository;
use storage::seed::{DEMO_EMAIL, DEMO_PASSWORD, seed_catalog, seed_local};
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    catalog_only: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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
        let mut db_url =
            std::env::var("CINESTREAM_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut catalog_only = false;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--catalog-only" => catalog_only = true,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
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
            catalog_only,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --catalog-only            Skip the demo viewer's profile and history");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  CINESTREAM_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    let now = args.now.unwrap_or_else(Utc::now);

    if args.catalog_only {
        let count = seed_catalog(&repo, now).await?;
        println!("Seeded {count} titles into {}", args.db_url);
        return Ok(());
    }

    // Accounts are not stored in SQLite; the app registers the demo login itself.
    let report = seed_local(&repo, &InMemoryRepository::new(), now).await?;
    println!(
        "Seeded {} titles and {} progress rows into {}",
        report.content, report.progress, args.db_url
    );
    println!("Demo login (local backend): {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run().await {
        eprintln!("seed failed: {err}");
        std::process::exit(1);
    }
}
