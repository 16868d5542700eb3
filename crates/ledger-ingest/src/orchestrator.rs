//! Ingestion orchestrator
//!
//! Runs each task through
//! `fetch -> sanitize + validate -> diagnostic log -> identify -> upload`,
//! one task at a time, in order. A failing task is reported and the run
//! carries on with the next one; the summary is always produced.

use crate::diagnostics::write_diagnostics;
use crate::error::Result;
use crate::pipeline::{prepare_batch, process_rows, row_identifier};
use crate::sink::RecordSink;
use crate::source::RowSource;
use crate::tasks::{SourceTask, TaskId};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const RULE_WIDTH: usize = 90;

/// Why a task uploaded nothing without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The tab had no data rows
    NoData,
    /// Every row was rejected by validation
    NoValidRows,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "No data found"),
            SkipReason::NoValidRows => write!(f, "No valid rows"),
        }
    }
}

/// Final state of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Uploaded { rows: usize },
    Skipped(SkipReason),
    Failed(String),
}

/// Outcome of one task
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task: TaskId,
    pub status: TaskStatus,
    /// Rows rejected by validation
    pub rejected: usize,
    pub diagnostic_log: Option<PathBuf>,
    pub elapsed: Duration,
}

impl TaskReport {
    /// Rows uploaded (zero unless the task uploaded)
    pub fn rows(&self) -> usize {
        match self.status {
            TaskStatus::Uploaded { rows } => rows,
            _ => 0,
        }
    }

    /// True unless the task failed
    pub fn completed(&self) -> bool {
        !matches!(self.status, TaskStatus::Failed(_))
    }
}

/// Aggregate over all tasks of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<TaskReport>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn completed(&self) -> usize {
        self.reports.iter().filter(|r| r.completed()).count()
    }

    pub fn total_rows(&self) -> usize {
        self.reports.iter().map(TaskReport::rows).sum()
    }

    pub fn report(&self, task: TaskId) -> Option<&TaskReport> {
        self.reports.iter().find(|r| r.task == task)
    }
}

/// What a successful task run produced
struct TaskOutcome {
    status: TaskStatus,
    rejected: usize,
    diagnostic_log: Option<PathBuf>,
}

pub struct Orchestrator<'a> {
    source: &'a dyn RowSource,
    sink: &'a dyn RecordSink,
    log_dir: PathBuf,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        source: &'a dyn RowSource,
        sink: &'a dyn RecordSink,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            sink,
            log_dir: log_dir.into(),
        }
    }

    /// Run every task in order and summarise.
    pub async fn run(&self, tasks: &[SourceTask]) -> RunSummary {
        let started = Instant::now();
        banner("DATA INGESTION STARTED");

        let mut reports = Vec::with_capacity(tasks.len());
        for task in tasks {
            reports.push(self.run_task(task).await);
        }

        banner("DATA INGESTION FINISHED");

        RunSummary {
            reports,
            elapsed: started.elapsed(),
        }
    }

    /// Run one task, converting any failure into a report.
    pub async fn run_task(&self, task: &SourceTask) -> TaskReport {
        divider(task.spec.title);
        let started = Instant::now();

        let report = match self.execute(task).await {
            Ok(outcome) => TaskReport {
                task: task.spec.id,
                status: outcome.status,
                rejected: outcome.rejected,
                diagnostic_log: outcome.diagnostic_log,
                elapsed: started.elapsed(),
            },
            Err(e) => TaskReport {
                task: task.spec.id,
                status: TaskStatus::Failed(e.to_string()),
                rejected: 0,
                diagnostic_log: None,
                elapsed: started.elapsed(),
            },
        };

        match &report.status {
            TaskStatus::Uploaded { rows } => info!(
                "STATUS: Processed {} rows in {:.2}s",
                rows,
                report.elapsed.as_secs_f64()
            ),
            TaskStatus::Skipped(reason) => info!("STATUS: Skipped ({})", reason),
            TaskStatus::Failed(message) => error!("STATUS: ERROR - {}", message),
        }

        report
    }

    async fn execute(&self, task: &SourceTask) -> Result<TaskOutcome> {
        let spec = task.spec;
        let schema = spec.schema();

        let raw = self.source.fetch_rows(&task.tab).await?;
        if raw.is_empty() {
            info!("No records found in sheet.");
            // Nothing was validated, so any earlier diagnostic log is stale.
            let diagnostic_log = write_diagnostics(&self.log_dir, spec.log_file, &[])?;
            return Ok(TaskOutcome {
                status: TaskStatus::Skipped(SkipReason::NoData),
                rejected: 0,
                diagnostic_log,
            });
        }
        debug!(task = spec.title, rows = raw.len(), "fetched raw rows");

        let outcome = process_rows(schema, &raw);
        let rejected = outcome.errors.len();
        let diagnostic_log = write_diagnostics(&self.log_dir, spec.log_file, &outcome.errors)?;

        if outcome.records.is_empty() {
            info!("No valid data found.");
            return Ok(TaskOutcome {
                status: TaskStatus::Skipped(SkipReason::NoValidRows),
                rejected,
                diagnostic_log,
            });
        }
        info!("Validation complete. {} rows cleared.", outcome.records.len());

        let batch = prepare_batch(schema, outcome.records);
        if let (Some(first), Some(last)) = (batch.rows.first(), batch.rows.last()) {
            if let (Some(first), Some(last)) =
                (row_identifier(schema, first), row_identifier(schema, last))
            {
                debug!("Assigned transaction ids {} .. {}", first, last);
            }
        }

        let rows = self.sink.upload(&batch, spec.table).await?;

        Ok(TaskOutcome {
            status: TaskStatus::Uploaded { rows },
            rejected,
            diagnostic_log,
        })
    }
}

/// Log the closing statistics block.
pub fn log_summary(summary: &RunSummary, run_log: Option<&Path>) {
    info!("STATISTICS:");
    info!("- Total Time: {:.2}s", summary.elapsed.as_secs_f64());
    info!(
        "- Tasks: {}/{} completed successfully",
        summary.completed(),
        summary.total()
    );
    info!("- Total Rows Processed: {}", summary.total_rows());

    for report in &summary.reports {
        let status = match &report.status {
            TaskStatus::Uploaded { rows } => format!("uploaded {} rows", rows),
            TaskStatus::Skipped(reason) => format!("skipped ({})", reason),
            TaskStatus::Failed(message) => format!("failed: {}", message),
        };
        match &report.diagnostic_log {
            Some(path) => info!(
                "  {}: {}, {} rejected (see {})",
                report.task,
                status,
                report.rejected,
                path.display()
            ),
            None => info!("  {}: {}", report.task, status),
        }
    }

    if let Some(path) = run_log {
        info!("{}", "=".repeat(RULE_WIDTH));
        info!("LOG SAVED TO: {}", path.display());
        info!("{}", "=".repeat(RULE_WIDTH));
    }
}

fn banner(title: &str) {
    let centered = format!("{:-^width$}", format!(" {} ", title), width = RULE_WIDTH);
    info!("{}", "-".repeat(RULE_WIDTH));
    info!("{}", centered);
    info!("{}", "-".repeat(RULE_WIDTH));
}

fn divider(title: &str) {
    info!("{}", "-".repeat(RULE_WIDTH));
    info!(" PROCESS: {} ", title.to_uppercase());
    info!("{}", "-".repeat(RULE_WIDTH));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn report(task: TaskId, status: TaskStatus) -> TaskReport {
        TaskReport {
            task,
            status,
            rejected: 0,
            diagnostic_log: None,
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary {
            reports: vec![
                report(TaskId::ChartOfAccounts, TaskStatus::Uploaded { rows: 40 }),
                report(TaskId::Expenses01, TaskStatus::Skipped(SkipReason::NoData)),
                report(TaskId::Expenses02, TaskStatus::Failed("boom".to_string())),
                report(TaskId::Invoices01, TaskStatus::Uploaded { rows: 2 }),
            ],
            elapsed: Duration::from_secs(1),
        };

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.completed(), 3);
        assert_eq!(summary.total_rows(), 42);
        assert_eq!(summary.report(TaskId::Expenses02).unwrap().rows(), 0);
        assert!(summary.report(TaskId::RecurringFees01).is_none());
    }

    #[test]
    fn test_skip_reason_text() {
        assert_eq!(SkipReason::NoData.to_string(), "No data found");
        assert_eq!(SkipReason::NoValidRows.to_string(), "No valid rows");
    }
}
