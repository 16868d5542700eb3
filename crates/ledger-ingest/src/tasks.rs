//! Task catalogue
//!
//! A task binds a source schema to a spreadsheet tab, a destination table and
//! a diagnostic log file. Tasks always run in catalogue order.

use crate::schema::{SourceKind, SourceSchema};
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TaskId {
    #[value(name = "coa")]
    ChartOfAccounts,
    #[value(name = "expenses01")]
    Expenses01,
    #[value(name = "expenses02")]
    Expenses02,
    #[value(name = "invoices01")]
    Invoices01,
    #[value(name = "recurring01")]
    RecurringFees01,
}

impl TaskId {
    pub fn spec(&self) -> &'static TaskSpec {
        match self {
            TaskId::ChartOfAccounts => &TASKS[0],
            TaskId::Expenses01 => &TASKS[1],
            TaskId::Expenses02 => &TASKS[2],
            TaskId::Invoices01 => &TASKS[3],
            TaskId::RecurringFees01 => &TASKS[4],
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().title)
    }
}

/// Static description of one ingestion task
#[derive(Debug)]
pub struct TaskSpec {
    pub id: TaskId,
    pub title: &'static str,
    pub kind: SourceKind,
    /// Environment variable holding the sheet tab name
    pub tab_env: &'static str,
    pub table: &'static str,
    pub log_file: &'static str,
}

impl TaskSpec {
    pub fn schema(&self) -> &'static SourceSchema {
        self.kind.schema()
    }
}

pub static TASKS: [TaskSpec; 5] = [
    TaskSpec {
        id: TaskId::ChartOfAccounts,
        title: "Chart of Accounts",
        kind: SourceKind::ChartOfAccounts,
        tab_env: "COA_TAB_NAME",
        table: "chart_of_accounts",
        log_file: "coa_ingestion.logs",
    },
    TaskSpec {
        id: TaskId::Expenses01,
        title: "Expenses 01",
        kind: SourceKind::Expense,
        tab_env: "EXPENSES01_TAB_NAME",
        table: "latest_expenses_01",
        log_file: "expenses_01_ingestion.logs",
    },
    TaskSpec {
        id: TaskId::Expenses02,
        title: "Expenses 02",
        kind: SourceKind::Expense,
        tab_env: "EXPENSES02_TAB_NAME",
        table: "latest_expenses_02",
        log_file: "expenses_02_ingestion.logs",
    },
    TaskSpec {
        id: TaskId::Invoices01,
        title: "Invoices 01",
        kind: SourceKind::Invoice,
        tab_env: "INVOICES01_TAB_NAME",
        table: "latest_invoices_01",
        log_file: "invoices_ingestion.logs",
    },
    TaskSpec {
        id: TaskId::RecurringFees01,
        title: "Recurring Fees",
        kind: SourceKind::RecurringFee,
        tab_env: "RECURRING01_TAB_NAME",
        table: "latest_recurring_fees_01",
        log_file: "recurring_fee_ingestion.logs",
    },
];

/// Task specs in run order, restricted to `selected` when it is non-empty.
pub fn select(selected: &[TaskId]) -> Vec<&'static TaskSpec> {
    TASKS
        .iter()
        .filter(|task| selected.is_empty() || selected.contains(&task.id))
        .collect()
}

/// A task ready to run: its spec plus the resolved tab name
#[derive(Debug, Clone)]
pub struct SourceTask {
    pub spec: &'static TaskSpec,
    pub tab: String,
}

impl SourceTask {
    pub fn new(spec: &'static TaskSpec, tab: impl Into<String>) -> Self {
        Self {
            spec,
            tab: tab.into(),
        }
    }
}
