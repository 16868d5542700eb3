//! Shared test doubles for orchestration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ledger_ingest::record::{Record, RecordBatch};
use ledger_ingest::sink::{self, RecordSink, SinkError};
use ledger_ingest::source::{self, RowSource, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves fixed rows per tab; unknown tabs fail like a missing sheet tab.
#[derive(Default)]
pub struct MemorySource {
    tabs: HashMap<String, Vec<Record>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(mut self, tab: &str, rows: Vec<Record>) -> Self {
        self.tabs.insert(tab.to_string(), rows);
        self
    }
}

#[async_trait]
impl RowSource for MemorySource {
    async fn fetch_rows(&self, tab: &str) -> source::Result<Vec<Record>> {
        self.tabs
            .get(tab)
            .cloned()
            .ok_or_else(|| SourceError::TabNotFound {
                tab: tab.to_string(),
                available: self.tabs.keys().cloned().collect(),
            })
    }
}

/// Records every upload instead of writing anywhere.
#[derive(Default)]
pub struct RecordingSink {
    uploads: Mutex<Vec<(String, RecordBatch)>>,
    reject_tables: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail uploads to `table` with a sink error.
    pub fn rejecting(mut self, table: &str) -> Self {
        self.reject_tables.push(table.to_string());
        self
    }

    pub fn uploads(&self) -> Vec<(String, RecordBatch)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn batch_for(&self, table: &str) -> Option<RecordBatch> {
        self.uploads()
            .into_iter()
            .find(|(t, _)| t == table)
            .map(|(_, batch)| batch)
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn upload(&self, batch: &RecordBatch, table: &str) -> sink::Result<usize> {
        if self.reject_tables.iter().any(|t| t == table) {
            return Err(SinkError::InvalidIdentifier(table.to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((table.to_string(), batch.clone()));
        Ok(batch.len())
    }
}

pub fn expense_row(code: &str, amount: &str) -> Record {
    Record::new()
        .with("expense_record_date", "01/20/2026 14:30:00")
        .with("expense_date", "1/20/2026")
        .with("account_code", code)
        .with("expense_description", "Printer paper")
        .with("expense_amount", amount)
        .with("expense_sender", "Dana")
        .with("expense_comments", "")
}

pub fn coa_row(code: i64, name: &str) -> Record {
    Record::new()
        .with("account_code", code)
        .with("account_name", name)
        .with("account_description", "")
        .with("account_parent_code", 1000i64)
        .with("account_main_category", "Assets")
        .with("account_sub_category", "Current Assets")
        .with("account_coa_category", "Balance Sheet")
        .with("account_in_expense_dashboard", "No")
        .with("account_dup_code", "FALSE")
}
