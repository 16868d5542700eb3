//! Row sources
//!
//! A [`RowSource`] returns the rows of one spreadsheet tab as raw
//! [`Record`]s, in sheet order, header excluded. An empty tab yields an empty
//! vector rather than an error.

pub mod sheets;

use crate::record::Record;
use async_trait::async_trait;
use thiserror::Error;

pub use sheets::{records_from_grid, SheetsAuth, SheetsClient};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid source URL: {0}")]
    Url(String),

    #[error("Source returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Tab Name: {tab} not found, available: {available:?}")]
    TabNotFound { tab: String, available: Vec<String> },

    #[error("Duplicate column header '{0}'")]
    DuplicateHeader(String),

    #[error("Failed to decode source response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Fetches raw rows for a tab
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self, tab: &str) -> Result<Vec<Record>>;
}
