//! Postgres upsert sink
//!
//! Each upload runs in one transaction and is split into chunks that stay
//! under the Postgres bind-parameter limit. Rows are written with
//! `INSERT ... ON CONFLICT (key) DO UPDATE SET col = EXCLUDED.col`, so a
//! re-run overwrites rather than duplicates. Every row of an upload gets the
//! same timestamp, captured once when the upload starts.

use super::{RecordSink, Result, SinkError, TableTarget};
use crate::config::{DatabaseConfig, UploadConfig};
use crate::record::{Column, FieldValue, RecordBatch, ValidatedRecord};
use crate::schema::FieldType;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// Maximum number of bind parameters in one Postgres statement
pub const POSTGRES_MAX_BINDS: usize = 65_535;

pub struct PgSink {
    pool: PgPool,
    chunk_size: usize,
}

impl PgSink {
    pub fn new(pool: PgPool, chunk_size: usize) -> Self {
        Self { pool, chunk_size }
    }

    /// Create the pool without connecting; connection errors surface on the
    /// first upload and fail only that task.
    pub fn connect(database: &DatabaseConfig, upload: &UploadConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.connect_timeout_secs))
            .connect_lazy(&database.url)?;

        info!(
            max_connections = database.max_connections,
            chunk_size = upload.chunk_size,
            "Database connection pool created"
        );

        Ok(Self::new(pool, upload.chunk_size))
    }
}

#[async_trait]
impl RecordSink for PgSink {
    async fn upload(&self, batch: &RecordBatch, table: &str) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let statement = UpsertStatement::new(table, TableTarget::resolve(table), &batch.columns)?;
        let chunk_size = statement.chunk_size(self.chunk_size);
        let uploaded_at = Utc::now();

        info!(
            "Uploading {} rows to {}.{} (conflict key: {})",
            batch.len(),
            statement.target.schema,
            table,
            statement.target.conflict_key
        );

        let mut tx = self.pool.begin().await?;
        let total_chunks = batch.len().div_ceil(chunk_size);

        for (index, chunk) in batch.rows.chunks(chunk_size).enumerate() {
            debug!("Upserting chunk {} / {} ({} rows)", index + 1, total_chunks, chunk.len());
            let mut builder = statement.builder(chunk, uploaded_at);
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!("Upserted {} rows into {}.{}", batch.len(), statement.target.schema, table);
        Ok(batch.len())
    }
}

/// Upsert statement shape for one table and column set
#[derive(Debug, Clone)]
pub struct UpsertStatement {
    pub target: TableTarget,
    qualified_table: String,
    columns: Vec<Column>,
}

impl UpsertStatement {
    pub fn new(table: &str, target: TableTarget, columns: &[Column]) -> Result<Self> {
        if !columns.iter().any(|c| c.name == target.conflict_key) {
            return Err(SinkError::MissingConflictKey {
                table: table.to_string(),
                key: target.conflict_key.to_string(),
            });
        }

        for name in columns.iter().map(|c| c.name).chain([target.timestamp_column]) {
            quote_ident(name)?;
        }

        Ok(Self {
            target,
            qualified_table: format!("{}.{}", quote_ident(target.schema)?, quote_ident(table)?),
            columns: columns.to_vec(),
        })
    }

    /// Rows per statement: the configured size, capped by the bind limit.
    pub fn chunk_size(&self, configured: usize) -> usize {
        let per_row = self.columns.len() + 1;
        configured.min(POSTGRES_MAX_BINDS / per_row).max(1)
    }

    /// Build the statement for one chunk of rows.
    pub fn builder<'args>(
        &self,
        rows: &'args [ValidatedRecord],
        uploaded_at: DateTime<Utc>,
    ) -> QueryBuilder<'args, Postgres> {
        let column_list = self
            .columns
            .iter()
            .map(|c| c.name)
            .chain([self.target.timestamp_column])
            .map(quoted)
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", self.qualified_table, column_list));

        builder.push_values(rows, |mut b, row| {
            for column in &self.columns {
                bind_value(&mut b, row.get(column.name), column.ty);
            }
            b.push_bind(uploaded_at);
        });

        let updates = self
            .columns
            .iter()
            .map(|c| c.name)
            .filter(|name| *name != self.target.conflict_key)
            .chain([self.target.timestamp_column])
            .map(|name| format!("{0} = EXCLUDED.{0}", quoted(name)))
            .collect::<Vec<_>>()
            .join(", ");

        builder.push(format!(
            " ON CONFLICT ({}) DO UPDATE SET {}",
            quoted(self.target.conflict_key),
            updates
        ));

        builder
    }
}

fn quote_ident(name: &str) -> Result<String> {
    if name.is_empty() || name.contains('"') || name.contains('\0') {
        return Err(SinkError::InvalidIdentifier(name.to_string()));
    }
    Ok(quoted(name))
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Bind one value; NULLs carry the column type so every row of a VALUES
/// list agrees on parameter types.
fn bind_value<'args>(
    b: &mut Separated<'_, 'args, Postgres, &'static str>,
    value: Option<&'args FieldValue>,
    ty: FieldType,
) {
    match value {
        Some(FieldValue::Integer(v)) => {
            b.push_bind(*v);
        },
        Some(FieldValue::Decimal(v)) => {
            b.push_bind(*v);
        },
        Some(FieldValue::Text(v)) => {
            b.push_bind(v.as_str());
        },
        Some(FieldValue::Boolean(v)) => {
            b.push_bind(*v);
        },
        Some(FieldValue::Date(v)) => {
            b.push_bind(*v);
        },
        Some(FieldValue::DateTime(v)) => {
            b.push_bind(*v);
        },
        Some(FieldValue::Null) | None => bind_null(b, ty),
    }
}

fn bind_null(b: &mut Separated<'_, '_, Postgres, &'static str>, ty: FieldType) {
    match ty {
        FieldType::Integer => b.push_bind(None::<i64>),
        FieldType::Decimal => b.push_bind(None::<f64>),
        FieldType::Text => b.push_bind(None::<String>),
        FieldType::Boolean => b.push_bind(None::<bool>),
        FieldType::Date => b.push_bind(None::<NaiveDate>),
        FieldType::DateTime => b.push_bind(None::<NaiveDateTime>),
    };
}
