use std::fs::File;
use std::io::Read;
use std::path::Path;

use reckon_core::{FileRef, RawTransaction, Receipt, Statement, StatementId};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Cannot derive a statement id from {0}")]
    StatementName(String),
}

/// `source_id,merchant,amount,date,file_reference`
#[derive(Debug, Deserialize)]
struct ReceiptRecord {
    source_id: String,
    merchant: Option<String>,
    amount: Option<String>,
    date: Option<String>,
    file_reference: Option<String>,
}

/// `sequence_index,date,description,amount`
#[derive(Debug, Deserialize)]
struct StatementRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    sequence_index: Option<u32>,
    date: Option<String>,
    #[serde(default)]
    description: String,
    amount: Option<String>,
}

pub fn read_receipts(path: &Path) -> Result<Vec<Receipt>, LoadError> {
    parse_receipts(File::open(path)?)
}

pub fn parse_receipts<R: Read>(data: R) -> Result<Vec<Receipt>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);
    let mut receipts = Vec::new();

    for record in reader.deserialize::<ReceiptRecord>() {
        let record = record?;
        receipts.push(Receipt::from_extracted(
            record.source_id,
            record.merchant.as_deref(),
            record.amount.as_deref(),
            record.date.as_deref(),
            FileRef::new(record.file_reference.unwrap_or_default()),
        ));
    }

    Ok(receipts)
}

/// The statement id is the file stem, so `amex.csv` becomes `amex`.
pub fn read_statement(path: &Path) -> Result<Statement, LoadError> {
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LoadError::StatementName(path.display().to_string()))?;
    parse_statement(StatementId::from(id), File::open(path)?)
}

/// Rows are kept as-is; validation happens when the statement is matched,
/// so one bad row fails the statement instead of the load.
pub fn parse_statement<R: Read>(id: StatementId, data: R) -> Result<Statement, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);
    let mut transactions = Vec::new();

    for record in reader.deserialize::<StatementRecord>() {
        let record = record?;
        transactions.push(RawTransaction {
            statement_id: id.clone(),
            sequence_index: record.sequence_index,
            date: record.date,
            description: Some(record.description),
            amount: record.amount,
        });
    }

    Ok(Statement { id, transactions })
}
