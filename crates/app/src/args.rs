use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8001";

/// `--db` value that selects the non-persistent store.
pub const MEMORY_DB: &str = "memory";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidAddr { raw: String },
    InvalidRngSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAddr { raw } => {
                write!(f, "invalid --addr value (expected host:port): {raw}")
            }
            ArgsError::InvalidRngSeed { raw } => write!(f, "invalid --rng-seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Seed,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "serve" => Some(Self::Serve),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub database: Database,
    pub addr: SocketAddr,
    pub rng_seed: Option<u64>,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [serve] [--db <sqlite_url|memory>] [--addr <host:port>] [--rng-seed <u64>]");
    eprintln!("  app seed    [--db <sqlite_url>] [--rng-seed <u64>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --addr {DEFAULT_ADDR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_ADDR, QUIZ_RNG_SEED, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_database(raw: String) -> Result<Database, ArgsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw });
    }
    if trimmed.eq_ignore_ascii_case(MEMORY_DB) {
        return Ok(Database::Memory);
    }
    Ok(Database::Sqlite(normalize_sqlite_url(trimmed)))
}

fn parse_addr(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidAddr { raw })
}

fn parse_rng_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidRngSeed { raw })
}

impl Args {
    /// Parse `argv` (without the program name), falling back to `env` for
    /// anything not given as a flag.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags, missing values, or values that do
    /// not parse, whether they come from flags or the environment.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let command = match args.next_if(|arg| !arg.starts_with('-')) {
            None => Command::Serve,
            Some(first) => Command::from_arg(&first).ok_or(ArgsError::UnknownCommand(first))?,
        };

        let mut database =
            parse_database(env("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()))?;
        let mut addr = parse_addr(env("QUIZ_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into()))?;
        let mut rng_seed = env("QUIZ_RNG_SEED").map(parse_rng_seed).transpose()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => database = parse_database(require_value(&mut args, "--db")?)?,
                "--addr" => addr = parse_addr(require_value(&mut args, "--addr")?)?,
                "--rng-seed" => {
                    rng_seed = Some(parse_rng_seed(require_value(&mut args, "--rng-seed")?)?);
                }
                "--help" | "-h" => {
                    return Ok(Self {
                        command: Command::Help,
                        database,
                        addr,
                        rng_seed,
                    });
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command,
            database,
            addr,
            rng_seed,
        })
    }
}

/// Turn bare and relative paths into absolute `sqlite://` URLs.
pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw);
    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist.
///
/// # Errors
///
/// Returns an error if the URL has no file path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }

    let path = Path::new(path);
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
