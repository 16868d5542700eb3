//! Schema registry
//!
//! Each source type is described by a plain [`SourceSchema`] value: its
//! required and optional fields with their target types, how the sanitizer
//! should treat each field, per-field coercion overrides, the columns shown in
//! diagnostic snapshots, and the synthetic identifier (if any). A single
//! generic validator consumes these values; no source gets its own code path.

pub mod coerce;
mod sources;

use crate::record::{Cell, FieldValue};

pub use sources::{CHART_OF_ACCOUNTS, EXPENSE, INVOICE, RECURRING_FEE};

/// Converts a present, non-NULL cell into a typed value or an error message.
pub type Coercion = fn(&Cell) -> Result<FieldValue, String>;

/// Target type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Decimal,
    Text,
    Boolean,
    Date,
    DateTime,
}

impl FieldType {
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    /// Default coercion for this type
    pub fn coercion(&self) -> Coercion {
        match self {
            FieldType::Integer => coerce::integer,
            FieldType::Decimal => coerce::decimal,
            FieldType::Text => coerce::text,
            FieldType::Boolean => coerce::boolean,
            FieldType::Date => coerce::date,
            FieldType::DateTime => coerce::datetime,
        }
    }
}

/// How the sanitizer treats a field before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clean {
    /// Derived from the field type: dates are normalized, text is trimmed,
    /// optional blanks collapse to NULL
    Standard,
    /// Monetary amount: strip `$`, `,` and whitespace. Required fields
    /// default to `"0"` when blank, optional ones become NULL.
    Currency,
    /// Join-key code stored as text: trimmed, `"0"` when absent
    Code,
}

/// One field of a source schema
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub clean: Clean,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            clean: Clean::Standard,
        }
    }

    pub const fn currency(name: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::Decimal,
            clean: Clean::Currency,
        }
    }

    pub const fn code(name: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::Integer,
            clean: Clean::Code,
        }
    }
}

/// Synthetic transaction identifier settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierSpec {
    /// e.g. "EXP"
    pub prefix: &'static str,
    /// e.g. "expense_transaction_id"
    pub column: &'static str,
}

/// Source types known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    ChartOfAccounts,
    Expense,
    Invoice,
    RecurringFee,
}

impl SourceKind {
    pub fn schema(&self) -> &'static SourceSchema {
        match self {
            SourceKind::ChartOfAccounts => &CHART_OF_ACCOUNTS,
            SourceKind::Expense => &EXPENSE,
            SourceKind::Invoice => &INVOICE,
            SourceKind::RecurringFee => &RECURRING_FEE,
        }
    }
}

/// Declarative description of one source type
#[derive(Debug)]
pub struct SourceSchema {
    pub kind: SourceKind,
    pub required: &'static [FieldSpec],
    pub optional: &'static [FieldSpec],
    /// Overrides of the default type coercion, keyed by field name
    pub coercions: &'static [(&'static str, Coercion)],
    /// Fields rendered in diagnostic log snapshots, in order
    pub snapshot_columns: &'static [&'static str],
    pub identifier: Option<IdentifierSpec>,
}

impl SourceSchema {
    /// Every field, required first, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, bool)> {
        self.required
            .iter()
            .map(|f| (f, true))
            .chain(self.optional.iter().map(|f| (f, false)))
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().map(|(f, _)| f).find(|f| f.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|f| f.name == name)
    }

    /// Coercion for a field: the custom override if declared, else the type default
    pub fn coercion_for(&self, field: &FieldSpec) -> Coercion {
        self.coercions
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, coercion)| *coercion)
            .unwrap_or_else(|| field.ty.coercion())
    }
}
