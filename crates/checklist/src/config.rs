use std::{env, fmt, path::Path, str::FromStr, time::Duration};

use thiserror::Error;

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "checklist.db";

/// Default time a connection waits on a locked database.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while loading store configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required key: {0}")]
    MissingKey(&'static str),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Storage backend behind the checklist store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Process-local tables, lost on exit.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(other.to_string()),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Which backend to open (default: memory)
    pub backend: Backend,
    /// Path to the SQLite database file, or `:memory:` (default: "checklist.db")
    pub db_path: String,
    /// Busy timeout for a locked database (default: 5s)
    pub timeout: Duration,
    /// Whether SQLite enforces declared foreign keys (default: true)
    pub foreign_keys: bool,
    /// Optional `PRAGMA journal_mode` value, e.g. "WAL"
    pub journal_mode: Option<String>,
}

impl StoreConfig {
    /// SQLite configuration for `db_path` with default settings.
    pub fn sqlite(db_path: impl Into<String>) -> Self {
        Self {
            backend: Backend::Sqlite,
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHECKLIST_BACKEND` - `memory` or `sqlite` (default: memory)
    /// - `CHECKLIST_DB_PATH` - SQLite database path (default: "checklist.db")
    /// - `CHECKLIST_DB_TIMEOUT_SECS` - Busy timeout in seconds (default: 5)
    /// - `CHECKLIST_DB_FOREIGN_KEYS` - Enforce foreign keys (default: true)
    /// - `CHECKLIST_DB_JOURNAL_MODE` - Journal mode (default: SQLite's own)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("CHECKLIST_BACKEND") {
            config.backend = parse_backend("CHECKLIST_BACKEND", &value)?;
        }
        if let Some(value) = lookup("CHECKLIST_DB_PATH") {
            config.db_path = value;
        }
        if let Some(value) = lookup("CHECKLIST_DB_TIMEOUT_SECS") {
            config.timeout = parse_seconds("CHECKLIST_DB_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("CHECKLIST_DB_FOREIGN_KEYS") {
            config.foreign_keys = parse_bool("CHECKLIST_DB_FOREIGN_KEYS", &value)?;
        }
        config.journal_mode = lookup("CHECKLIST_DB_JOURNAL_MODE").filter(|v| !v.trim().is_empty());

        Ok(config)
    }

    /// Parse a `.properties` document.
    ///
    /// Recognized keys: `db.path` (required), `db.timeout` (seconds),
    /// `db.foreign_keys`, `db.journal_mode` and `db.backend`. A properties
    /// file describes a database, so the backend defaults to SQLite.
    pub fn from_properties_str(input: &str) -> Result<Self, ConfigError> {
        let mut db_path = None;
        let mut config = Self {
            backend: Backend::Sqlite,
            ..Self::default()
        };

        for (key, value) in parse_properties(input) {
            match key {
                "db.path" => db_path = Some(value.to_string()),
                "db.timeout" => config.timeout = parse_seconds("db.timeout", value)?,
                "db.foreign_keys" => config.foreign_keys = parse_bool("db.foreign_keys", value)?,
                "db.journal_mode" => {
                    config.journal_mode = Some(value.to_string()).filter(|v| !v.is_empty())
                }
                "db.backend" => config.backend = parse_backend("db.backend", value)?,
                _ => tracing::debug!(key, "Ignoring unknown configuration key"),
            }
        }

        config.db_path = db_path
            .filter(|path| !path.is_empty())
            .ok_or(ConfigError::MissingKey("db.path"))?;
        Ok(config)
    }

    /// Read and parse a `.properties` file.
    pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_properties_str(&contents)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            db_path: DEFAULT_DB_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            foreign_keys: true,
            journal_mode: None,
        }
    }
}

/// Yields trimmed `key=value` pairs, skipping comments and malformed lines.
fn parse_properties(input: &str) -> impl Iterator<Item = (&str, &str)> {
    input.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_seconds(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let seconds: f64 = value.trim().parse().map_err(|_| invalid(key, value))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid(key, value))
}

fn parse_backend(key: &'static str, value: &str) -> Result<Backend, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}
