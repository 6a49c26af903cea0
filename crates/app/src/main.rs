use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AuthService, Clock, DashboardService, FavoriteService, NavigationGuard,
};
use storage::remote::BackendConfig;
use storage::repository::InMemoryRepository;
use storage::seed::{DEMO_EMAIL, DEMO_PASSWORD, seed_local};
use storage::sqlite::SqliteRepository;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBackend { raw: String },
    MissingBackendUrl,
    InvalidBackendUrl { raw: String, reason: String },
    SeedNeedsLocal,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBackend { raw } => {
                write!(f, "invalid --backend value (expected hosted or local): {raw}")
            }
            ArgsError::MissingBackendUrl => write!(f, "the hosted backend needs --url"),
            ArgsError::InvalidBackendUrl { raw, reason } => {
                write!(f, "invalid backend url {raw}: {reason}")
            }
            ArgsError::SeedNeedsLocal => {
                write!(f, "seed only writes to a local database; use --backend local")
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

struct DesktopApp {
    services: AppServices,
    login_hint: Option<String>,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn navigation(&self) -> Arc<NavigationGuard> {
        self.services.navigation()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn favorites(&self) -> Arc<FavoriteService> {
        self.services.favorites()
    }

    fn login_hint(&self) -> Option<String> {
        self.login_hint.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Hosted,
    Local,
}

impl BackendKind {
    fn parse(raw: &str) -> Result<Self, ArgsError> {
        match raw.trim() {
            "hosted" => Ok(Self::Hosted),
            "local" => Ok(Self::Local),
            _ => Err(ArgsError::InvalidBackend {
                raw: raw.to_owned(),
            }),
        }
    }
}

/// Where accounts, catalog and progress live.
#[derive(Debug, Clone)]
enum Backend {
    Hosted(BackendConfig),
    Local { db_url: String },
}

struct Args {
    backend: Backend,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui   [--backend <hosted|local>] [--url <url>] [--anon-key <key>] [--db <sqlite_url>]"
    );
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --backend hosted when a url is set, local otherwise");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!();
    eprintln!("The local backend keeps the catalog in SQLite and signs in a demo viewer");
    eprintln!("({DEMO_EMAIL} / {DEMO_PASSWORD}).");
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  CINESTREAM_BACKEND, CINESTREAM_BACKEND_URL, CINESTREAM_ANON_KEY, CINESTREAM_DB_URL, RUST_LOG"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut kind = std::env::var("CINESTREAM_BACKEND")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| BackendKind::parse(&value))
            .transpose()?;
        let mut url = std::env::var("CINESTREAM_BACKEND_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut anon_key = std::env::var("CINESTREAM_ANON_KEY").unwrap_or_default();
        let mut db_url = std::env::var("CINESTREAM_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend" => {
                    let value = require_value(args, "--backend")?;
                    kind = Some(BackendKind::parse(&value)?);
                }
                "--url" => url = Some(require_value(args, "--url")?),
                "--anon-key" => anon_key = require_value(args, "--anon-key")?,
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let kind = kind.unwrap_or(if url.is_some() {
            BackendKind::Hosted
        } else {
            BackendKind::Local
        });
        let backend = match kind {
            BackendKind::Local => Backend::Local { db_url },
            BackendKind::Hosted => {
                let raw = url.ok_or(ArgsError::MissingBackendUrl)?;
                let config = BackendConfig::new(&raw, anon_key).map_err(|err| {
                    ArgsError::InvalidBackendUrl {
                        raw: raw.clone(),
                        reason: err.to_string(),
                    }
                })?;
                Backend::Hosted(config)
            }
        };
        Ok(Self { backend })
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    match (cmd, parsed.backend) {
        (Command::Ui, Backend::Hosted(config)) => {
            let services = AppServices::new_hosted(config, clock)?;
            launch(DesktopApp {
                services,
                login_hint: None,
            });
            Ok(())
        }
        (Command::Ui, Backend::Local { db_url }) => {
            prepare_sqlite_file(&db_url)?;
            let services = AppServices::new_local(&db_url, clock).await?;
            launch(DesktopApp {
                services,
                login_hint: Some(format!("Demo account: {DEMO_EMAIL} / {DEMO_PASSWORD}")),
            });
            Ok(())
        }
        (Command::Seed, Backend::Local { db_url }) => {
            prepare_sqlite_file(&db_url)?;
            let repo = SqliteRepository::connect(&db_url).await?;
            repo.migrate().await?;
            let report = seed_local(&repo, &InMemoryRepository::new(), clock.now()).await?;
            println!(
                "seeded {} titles and {} progress rows into {db_url}",
                report.content, report.progress
            );
            Ok(())
        }
        (Command::Seed, Backend::Hosted(_)) => Err(ArgsError::SeedNeedsLocal.into()),
    }
}

fn launch(app: DesktopApp) {
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // Some dev setups default the window to always-on-top; keep it a normal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("CineStream")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
