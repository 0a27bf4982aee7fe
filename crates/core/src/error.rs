use thiserror::Error;

use crate::money::Money;
use crate::transaction::StatementId;

/// Structurally invalid input. Rejects the whole statement batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    #[error("statement {statement}, row {row}: missing required field '{field}'")]
    MissingField {
        statement: StatementId,
        row: usize,
        field: &'static str,
    },
    #[error("statement {statement}, row {row}: amount '{value}' is not numeric")]
    InvalidAmount {
        statement: StatementId,
        row: usize,
        value: String,
    },
    #[error("statement {statement}, row {row}: cannot parse date '{value}'")]
    InvalidDate {
        statement: StatementId,
        row: usize,
        value: String,
    },
    #[error("statement {statement}: sequence index {sequence_index} appears more than once")]
    DuplicateSequence {
        statement: StatementId,
        sequence_index: u32,
    },
    #[error("statement {expected}, row {row}: transaction belongs to statement {found}")]
    StatementMismatch {
        expected: StatementId,
        found: StatementId,
        row: usize,
    },
    #[error("statement {0} was already processed in this run")]
    DuplicateStatement(StatementId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("match_threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(u8),
    #[error("amount_tolerance must not be negative, got {0}")]
    NegativeTolerance(Money),
    #[error("label_width must be within 1..=9, got {0}")]
    LabelWidth(usize),
    #[error("label prefix for statement '{0}' is empty")]
    EmptyLabelPrefix(String),
}

/// A statement that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("processed 0 of {total} transactions for statement {statement}: {source}")]
pub struct ReconcileError {
    pub statement: StatementId,
    pub total: usize,
    #[source]
    pub source: DataValidationError,
}
