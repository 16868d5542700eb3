//! Ledger Ingest Library
//!
//! Extract-validate-load pipeline for spreadsheet-kept ledgers: rows are
//! fetched from Google Sheets, sanitized, validated against a per-source
//! schema, given synthetic transaction ids and upserted into Postgres.
//!
//! # Pipeline
//!
//! - [`schema`]: declarative per-source field definitions and coercions
//! - [`sanitize`]: currency, code, date and whitespace normalization
//! - [`validate`]: the generic validator and diagnostic snapshots
//! - [`identifier`]: positional `PREFIX-LN-000002` ids
//! - [`orchestrator`]: per-task state machine with failure isolation
//!
//! # Example
//!
//! ```no_run
//! use ledger_ingest::config::IngestConfig;
//! use ledger_ingest::orchestrator::Orchestrator;
//! use ledger_ingest::sink::DryRunSink;
//! use ledger_ingest::source::SheetsClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::load(&[], true)?;
//!     let source = SheetsClient::new(&config.sheets)?;
//!     let summary = Orchestrator::new(&source, &DryRunSink, &config.log_dir)
//!         .run(&config.tasks)
//!         .await;
//!     println!("{} rows", summary.total_rows());
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod identifier;
pub mod orchestrator;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod schema;
pub mod sink;
pub mod source;
pub mod tasks;
pub mod validate;

pub use error::{IngestError, Result};
