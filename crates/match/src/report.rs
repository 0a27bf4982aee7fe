//! Flat rows handed to external report writers (spreadsheets, sheets APIs).

use chrono::NaiveDate;
use reckon_core::{MatchResult, Money, Receipt};
use serde::Serialize;

/// One line of a per-statement reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    pub label: String,
    pub statement: String,
    pub matched: bool,
    pub score: u8,
    pub transaction_date: NaiveDate,
    pub transaction_description: String,
    pub transaction_amount: Money,
    pub receipt_id: Option<String>,
    pub receipt_merchant: Option<String>,
    pub receipt_amount: Option<Money>,
    pub amount_difference: Option<Money>,
    pub receipt_file: Option<String>,
}

impl From<&MatchResult> for MatchRow {
    fn from(result: &MatchResult) -> Self {
        let tx = &result.transaction;
        let receipt = result.receipt.as_ref();
        MatchRow {
            label: result.label.clone(),
            statement: tx.statement_id.to_string(),
            matched: result.is_matched(),
            score: result.score,
            transaction_date: tx.date,
            transaction_description: tx.description.clone(),
            transaction_amount: tx.amount,
            receipt_id: receipt.map(|r| r.source_id.to_string()),
            receipt_merchant: receipt.map(|r| r.merchant.clone()),
            receipt_amount: receipt.and_then(|r| r.amount),
            amount_difference: result.amount_difference,
            receipt_file: receipt.map(|r| r.file_reference.to_string()),
        }
    }
}

/// One line of the end-of-run unmatched receipts report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedReceiptRow {
    pub receipt_id: String,
    pub receipt_date: Option<NaiveDate>,
    pub receipt_merchant: String,
    pub receipt_amount: Option<Money>,
    pub receipt_file: String,
}

impl From<&Receipt> for UnmatchedReceiptRow {
    fn from(receipt: &Receipt) -> Self {
        UnmatchedReceiptRow {
            receipt_id: receipt.source_id.to_string(),
            receipt_date: receipt.date,
            receipt_merchant: receipt.merchant.clone(),
            receipt_amount: receipt.amount,
            receipt_file: receipt.file_reference.to_string(),
        }
    }
}
