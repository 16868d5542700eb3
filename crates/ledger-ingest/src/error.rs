//! Task-level errors
//!
//! Any of these aborts the current task only. The orchestrator records it
//! as a failed task and moves on to the next one.

use crate::sink::SinkError;
use crate::source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Failed to write diagnostic log: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
