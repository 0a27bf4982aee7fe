use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::error::DataValidationError;
use super::money::Money;

/// Identifies the card or account a statement came from (e.g. `amex`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(String);

impl StatementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatementId {
    fn from(s: &str) -> Self {
        StatementId(s.to_string())
    }
}

impl From<String> for StatementId {
    fn from(s: String) -> Self {
        StatementId(s)
    }
}

/// A statement line as handed over by a statement parser, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub statement_id: StatementId,
    pub sequence_index: Option<u32>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
}

/// One validated credit-card statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub statement_id: StatementId,
    pub sequence_index: u32,
}

impl Transaction {
    /// `row` is the 1-based position of `raw` in its batch, used in errors.
    pub fn validate(raw: RawTransaction, row: usize) -> Result<Transaction, DataValidationError> {
        let statement = raw.statement_id;
        let missing = |field| DataValidationError::MissingField {
            statement: statement.clone(),
            row,
            field,
        };

        let sequence_index = raw.sequence_index.ok_or_else(|| missing("sequence_index"))?;
        let description = raw.description.ok_or_else(|| missing("description"))?;

        let date_text = raw
            .date
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| missing("date"))?;
        let date = parse_date(&date_text).ok_or_else(|| DataValidationError::InvalidDate {
            statement: statement.clone(),
            row,
            value: date_text.clone(),
        })?;

        let amount_text = raw
            .amount
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| missing("amount"))?;
        let amount = amount_text
            .parse::<Money>()
            .map_err(|_| DataValidationError::InvalidAmount {
                statement: statement.clone(),
                row,
                value: amount_text.clone(),
            })?;

        Ok(Transaction {
            date,
            description,
            amount,
            statement_id: statement,
            sequence_index,
        })
    }
}

/// All lines of one statement, in the order the parser produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub transactions: Vec<RawTransaction>,
}

impl Statement {
    pub fn new(id: impl Into<StatementId>, transactions: Vec<RawTransaction>) -> Self {
        Statement {
            id: id.into(),
            transactions,
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Validates every line and returns them sorted by `sequence_index`.
    ///
    /// All-or-nothing: the first bad line rejects the batch.
    pub fn validate(&self) -> Result<Vec<Transaction>, DataValidationError> {
        let mut seen = BTreeSet::new();
        let mut validated = Vec::with_capacity(self.transactions.len());

        for (idx, raw) in self.transactions.iter().enumerate() {
            let row = idx + 1;
            if raw.statement_id != self.id {
                return Err(DataValidationError::StatementMismatch {
                    expected: self.id.clone(),
                    found: raw.statement_id.clone(),
                    row,
                });
            }
            let tx = Transaction::validate(raw.clone(), row)?;
            if !seen.insert(tx.sequence_index) {
                return Err(DataValidationError::DuplicateSequence {
                    statement: self.id.clone(),
                    sequence_index: tx.sequence_index,
                });
            }
            validated.push(tx);
        }

        validated.sort_by_key(|tx| tx.sequence_index);
        Ok(validated)
    }
}

/// Parses the date layouts statement exports commonly use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Spreadsheet exports often carry a midnight timestamp.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}
