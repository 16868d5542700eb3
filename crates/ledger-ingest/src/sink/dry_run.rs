// Sink used by `--dry-run`: reports what would be written and touches nothing.

use super::{RecordSink, Result, TableTarget};
use crate::record::RecordBatch;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct DryRunSink;

#[async_trait]
impl RecordSink for DryRunSink {
    async fn upload(&self, batch: &RecordBatch, table: &str) -> Result<usize> {
        let target = TableTarget::resolve(table);
        info!(
            "[dry-run] Would upsert {} rows into {}.{} (conflict key: {})",
            batch.len(),
            target.schema,
            table,
            target.conflict_key
        );

        if let Some(first) = batch.rows.first() {
            match serde_json::to_string(first) {
                Ok(json) => debug!("[dry-run] first row: {}", json),
                Err(e) => debug!("[dry-run] first row not serializable: {}", e),
            }
        }

        Ok(batch.len())
    }
}
