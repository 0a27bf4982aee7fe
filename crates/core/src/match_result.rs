use serde::{Deserialize, Serialize};

use super::money::Money;
use super::receipt::{Receipt, SourceId};
use super::transaction::Transaction;

/// The outcome for one transaction: the receipt it claimed, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub transaction: Transaction,
    pub receipt: Option<Receipt>,
    /// Text similarity in 0..=100; 0 when unmatched.
    pub score: u8,
    /// Absent when unmatched or when the receipt amount is unknown.
    pub amount_difference: Option<Money>,
    pub label: String,
}

impl MatchResult {
    pub fn matched(
        transaction: Transaction,
        receipt: Receipt,
        score: u8,
        amount_difference: Option<Money>,
        label: String,
    ) -> Self {
        MatchResult {
            transaction,
            receipt: Some(receipt),
            score,
            amount_difference,
            label,
        }
    }

    pub fn unmatched(transaction: Transaction, label: String) -> Self {
        MatchResult {
            transaction,
            receipt: None,
            score: 0,
            amount_difference: None,
            label,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.receipt.is_some()
    }

    pub fn receipt_id(&self) -> Option<&SourceId> {
        self.receipt.as_ref().map(|r| &r.source_id)
    }
}
