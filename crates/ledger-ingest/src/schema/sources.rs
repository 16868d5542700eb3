// Concrete source schemas

use super::coerce;
use super::{FieldSpec, FieldType, IdentifierSpec, SourceKind, SourceSchema};

pub static CHART_OF_ACCOUNTS: SourceSchema = SourceSchema {
    kind: SourceKind::ChartOfAccounts,
    required: &[
        FieldSpec::new("account_code", FieldType::Integer),
        FieldSpec::new("account_name", FieldType::Text),
        FieldSpec::new("account_parent_code", FieldType::Integer),
        FieldSpec::new("account_main_category", FieldType::Text),
        FieldSpec::new("account_sub_category", FieldType::Text),
        FieldSpec::new("account_coa_category", FieldType::Text),
        FieldSpec::new("account_dup_code", FieldType::Boolean),
    ],
    optional: &[
        FieldSpec::new("account_description", FieldType::Text),
        FieldSpec::new("account_in_expense_dashboard", FieldType::Text),
    ],
    // Populated by an ARRAYFORMULA, so the sheet sends TRUE/FALSE text
    coercions: &[("account_dup_code", coerce::sheet_boolean)],
    snapshot_columns: &[
        "account_code",
        "account_name",
        "account_description",
        "account_parent_code",
        "account_main_category",
        "account_sub_category",
        "account_coa_category",
        "account_in_expense_dashboard",
        "account_dup_code",
    ],
    identifier: None,
};

pub static EXPENSE: SourceSchema = SourceSchema {
    kind: SourceKind::Expense,
    required: &[
        FieldSpec::new("expense_record_date", FieldType::DateTime),
        FieldSpec::new("expense_date", FieldType::Date),
        FieldSpec::code("account_code"),
        FieldSpec::new("expense_description", FieldType::Text),
        FieldSpec::currency("expense_amount"),
        FieldSpec::new("expense_sender", FieldType::Text),
    ],
    optional: &[FieldSpec::new("expense_comments", FieldType::Text)],
    coercions: &[],
    snapshot_columns: &[
        "expense_record_date",
        "expense_date",
        "account_code",
        "expense_description",
        "expense_amount",
        "expense_sender",
    ],
    identifier: Some(IdentifierSpec {
        prefix: "EXP",
        column: "expense_transaction_id",
    }),
};

pub static INVOICE: SourceSchema = SourceSchema {
    kind: SourceKind::Invoice,
    required: &[
        FieldSpec::new("invoice_record_date", FieldType::DateTime),
        FieldSpec::new("invoice_date", FieldType::Date),
        FieldSpec::new("invoice_item", FieldType::Text),
        FieldSpec::currency("invoice_total_cost"),
        FieldSpec::new("invoice_description", FieldType::Text),
        FieldSpec::new("invoice_name", FieldType::Text),
        FieldSpec::code("account_code"),
    ],
    optional: &[
        FieldSpec::currency("invoice_qty"),
        FieldSpec::new("invoice_unit_type", FieldType::Text),
        FieldSpec::currency("invoice_unit_price"),
        FieldSpec::new("invoice_comments", FieldType::Text),
        FieldSpec::new("invoice_supplier_name", FieldType::Text),
    ],
    coercions: &[],
    snapshot_columns: &[
        "invoice_record_date",
        "invoice_date",
        "invoice_item",
        "invoice_total_cost",
        "invoice_description",
        "invoice_name",
        "account_code",
    ],
    identifier: Some(IdentifierSpec {
        prefix: "INV",
        column: "invoice_transaction_id",
    }),
};

pub static RECURRING_FEE: SourceSchema = SourceSchema {
    kind: SourceKind::RecurringFee,
    required: &[
        FieldSpec::new("recurring_fee_record_date", FieldType::DateTime),
        FieldSpec::new("recurring_fee_date", FieldType::Date),
        FieldSpec::new("recurring_fee_name", FieldType::Text),
        FieldSpec::currency("recurring_fee_amount"),
        FieldSpec::new("recurring_fee_status", FieldType::Text),
        FieldSpec::new("recurring_fee_payment_status", FieldType::Text),
        FieldSpec::code("recurring_fee_account_code"),
        FieldSpec::new("recurring_fee_payment_terms", FieldType::Text),
    ],
    optional: &[
        FieldSpec::new("recurring_fee_type", FieldType::Text),
        FieldSpec::new("recurring_fee_contract_duration", FieldType::Text),
        FieldSpec::new("recurring_fee_comment", FieldType::Text),
    ],
    coercions: &[],
    snapshot_columns: &[
        "recurring_fee_record_date",
        "recurring_fee_date",
        "recurring_fee_name",
        "recurring_fee_amount",
        "recurring_fee_status",
        "recurring_fee_payment_status",
        "recurring_fee_account_code",
        "recurring_fee_payment_terms",
    ],
    identifier: Some(IdentifierSpec {
        prefix: "RCR",
        column: "recurring_fee_transaction_id",
    }),
};
