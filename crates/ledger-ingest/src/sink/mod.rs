//! Record sinks
//!
//! A [`RecordSink`] receives one validated batch per task together with the
//! destination table name. The sink, not the pipeline, decides the schema
//! namespace, the conflict key used for upserts and the upload timestamp.

pub mod dry_run;
pub mod postgres;

use crate::record::RecordBatch;
use async_trait::async_trait;
use thiserror::Error;

pub use dry_run::DryRunSink;
pub use postgres::{PgSink, UpsertStatement};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Batch for {table} has no '{key}' column to upsert on")]
    MissingConflictKey { table: String, key: String },

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Uploads validated batches
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Upsert `batch` into `table`, returning the number of rows written.
    async fn upload(&self, batch: &RecordBatch, table: &str) -> Result<usize>;
}

/// Where a logical table lives and how rows in it are deduplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTarget {
    pub schema: &'static str,
    pub conflict_key: &'static str,
    pub timestamp_column: &'static str,
}

impl TableTarget {
    pub const fn new(
        schema: &'static str,
        conflict_key: &'static str,
        timestamp_column: &'static str,
    ) -> Self {
        Self {
            schema,
            conflict_key,
            timestamp_column,
        }
    }

    pub fn resolve(table: &str) -> Self {
        match table {
            "chart_of_accounts" => {
                Self::new("accounting", "account_code", "account_updated_at")
            },
            "latest_expenses_01" | "latest_expenses_02" => {
                Self::new("expenses", "expense_transaction_id", "expense_record_updated_at")
            },
            "latest_invoices_01" => {
                Self::new("expenses", "invoice_transaction_id", "invoice_record_updated_at")
            },
            "latest_recurring_fees_01" => Self::new(
                "expenses",
                "recurring_fee_transaction_id",
                "recurring_fee_record_updated_at",
            ),
            _ => Self::new("public", "id", "updated_at"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tables() {
        let coa = TableTarget::resolve("chart_of_accounts");
        assert_eq!(coa.schema, "accounting");
        assert_eq!(coa.conflict_key, "account_code");
        assert_eq!(coa.timestamp_column, "account_updated_at");

        assert_eq!(
            TableTarget::resolve("latest_expenses_01"),
            TableTarget::resolve("latest_expenses_02")
        );
        assert_eq!(
            TableTarget::resolve("latest_invoices_01").conflict_key,
            "invoice_transaction_id"
        );
        assert_eq!(
            TableTarget::resolve("latest_recurring_fees_01").timestamp_column,
            "recurring_fee_record_updated_at"
        );
    }

    #[test]
    fn test_resolve_fallback() {
        assert_eq!(
            TableTarget::resolve("something_else"),
            TableTarget::new("public", "id", "updated_at")
        );
    }
}
