//! Configuration management
//!
//! Everything the pipeline needs from the environment is read once, into an
//! [`IngestConfig`] value that `main` passes down explicitly. A `.env` file is
//! loaded by `main` before [`IngestConfig::load`] runs.

use crate::source::SheetsAuth;
use crate::tasks::{self, SourceTask, TaskId};
use ledger_common::{env, CommonError};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default Sheets API endpoint.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default timeout for Sheets API requests in seconds.
pub const DEFAULT_SHEETS_TIMEOUT_SECS: u64 = 60;

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default number of rows per upsert statement.
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 500;

/// Largest accepted `UPLOAD_CHUNK_SIZE`.
pub const MAX_UPLOAD_CHUNK_SIZE: usize = 5000;

/// Default directory for the run log and diagnostic logs.
pub const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] CommonError),

    #[error(
        "Missing Sheets credentials: set GOOGLE_SHEETS_ACCESS_TOKEN or GOOGLE_SHEETS_API_KEY"
    )]
    MissingSheetsCredentials,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Sheets API settings
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub auth: SheetsAuth,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Database settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"***")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Upload settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub chunk_size: usize,
    pub dry_run: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
            dry_run: false,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub sheets: SheetsConfig,
    /// `None` only for dry runs
    pub database: Option<DatabaseConfig>,
    pub upload: UploadConfig,
    /// Tasks to run, in catalogue order, with resolved tab names
    pub tasks: Vec<SourceTask>,
    pub log_dir: PathBuf,
}

impl IngestConfig {
    /// Load configuration from the environment.
    ///
    /// `selected` restricts the run to those tasks (empty means all); only
    /// their tab names are required. `DATABASE_URL` is not required when
    /// `dry_run` is set.
    pub fn load(selected: &[TaskId], dry_run: bool) -> Result<Self> {
        let sheets = SheetsConfig {
            spreadsheet_id: env::required("GOOGLE_SHEET_ID")?,
            auth: sheets_auth()?,
            base_url: env::optional("GOOGLE_SHEETS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
            timeout_secs: env::parse_or("GOOGLE_SHEETS_TIMEOUT", DEFAULT_SHEETS_TIMEOUT_SECS)?,
        };

        let database = if dry_run {
            None
        } else {
            Some(DatabaseConfig {
                url: env::required("DATABASE_URL")?,
                max_connections: env::parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                connect_timeout_secs: env::parse_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                )?,
            })
        };

        let upload = UploadConfig {
            chunk_size: env::parse_or("UPLOAD_CHUNK_SIZE", DEFAULT_UPLOAD_CHUNK_SIZE)?,
            dry_run,
        };

        let tasks = tasks::select(selected)
            .into_iter()
            .map(|spec| -> Result<SourceTask> {
                Ok(SourceTask::new(spec, env::required(spec.tab_env)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let log_dir = env::optional("INGEST_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let config = Self {
            sheets,
            database,
            upload,
            tasks,
            log_dir,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sheets.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "GOOGLE_SHEETS_TIMEOUT must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_UPLOAD_CHUNK_SIZE).contains(&self.upload.chunk_size) {
            return Err(ConfigError::Invalid(format!(
                "UPLOAD_CHUNK_SIZE must be between 1 and {}, got {}",
                MAX_UPLOAD_CHUNK_SIZE, self.upload.chunk_size
            )));
        }

        match &self.database {
            Some(db) if db.max_connections == 0 => {
                return Err(ConfigError::Invalid(
                    "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
                ));
            },
            None if !self.upload.dry_run => {
                return Err(ConfigError::Invalid(
                    "DATABASE_URL is required unless running with --dry-run".to_string(),
                ));
            },
            _ => {},
        }

        if self.tasks.is_empty() {
            return Err(ConfigError::Invalid("No tasks selected".to_string()));
        }

        Ok(())
    }
}

/// Access token wins over API key when both are set.
fn sheets_auth() -> Result<SheetsAuth> {
    if let Some(token) = env::optional("GOOGLE_SHEETS_ACCESS_TOKEN") {
        return Ok(SheetsAuth::AccessToken(token));
    }
    env::optional("GOOGLE_SHEETS_API_KEY")
        .map(SheetsAuth::ApiKey)
        .ok_or(ConfigError::MissingSheetsCredentials)
}
