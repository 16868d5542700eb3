//! Ledger Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared logging and configuration helpers for the ledger workspace.
//!
//! - **Logging**: one `tracing` subscriber that writes every line to both the
//!   console and the run log file
//! - **Environment**: strict helpers for reading configuration variables
//! - **Error Handling**: the shared error and result types

pub mod env;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CommonError, Result};
