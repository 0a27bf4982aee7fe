use std::collections::{BTreeMap, HashSet};

use reckon_core::{DataValidationError, Receipt, SourceId, StatementId};
use serde::Serialize;

/// `"<prefix>_<position>"` with `position` zero-padded to `width` digits.
pub fn label(prefix: &str, position: usize, width: usize) -> String {
    format!("{prefix}_{position:0width$}")
}

/// Hands out consecutive labels for one statement, starting at 1.
#[derive(Debug)]
pub struct Labeler<'a> {
    prefix: &'a str,
    width: usize,
    issued: usize,
}

impl<'a> Labeler<'a> {
    pub fn new(prefix: &'a str, width: usize) -> Self {
        Self { prefix, width, issued: 0 }
    }

    pub fn next_label(&mut self) -> String {
        self.issued += 1;
        label(self.prefix, self.issued, self.width)
    }

    pub fn issued(&self) -> usize {
        self.issued
    }
}

/// Receipts not yet claimed by any transaction in the current run, in
/// discovery order. Owned by the caller and threaded through every
/// statement of the run.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    remaining: Vec<Receipt>,
}

impl CandidatePool {
    /// Receipts repeating an earlier `source_id` are dropped with a warning;
    /// they describe the same document.
    pub fn new(receipts: impl IntoIterator<Item = Receipt>) -> Self {
        let mut seen = HashSet::new();
        let mut remaining = Vec::new();
        for receipt in receipts {
            if seen.insert(receipt.source_id.clone()) {
                remaining.push(receipt);
            } else {
                tracing::warn!(source_id = %receipt.source_id, "duplicate receipt ignored");
            }
        }
        Self { remaining }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Receipt> {
        self.remaining.iter()
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.remaining.iter().any(|r| &r.source_id == id)
    }

    /// Removes a receipt once a transaction has claimed it.
    pub(crate) fn take(&mut self, id: &SourceId) -> Option<Receipt> {
        let idx = self.remaining.iter().position(|r| &r.source_id == id)?;
        Some(self.remaining.remove(idx))
    }
}

/// Who claimed a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub statement: StatementId,
    pub label: String,
}

/// Run-scoped bookkeeping: which receipts were claimed, by whom, and which
/// statements have already been processed. Start a fresh one per run.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    claims: BTreeMap<SourceId, Claim>,
    statements: Vec<StatementId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, id: &SourceId) -> bool {
        self.claims.contains_key(id)
    }

    pub fn claim(&self, id: &SourceId) -> Option<&Claim> {
        self.claims.get(id)
    }

    pub fn claimed_count(&self) -> usize {
        self.claims.len()
    }

    pub fn processed_statements(&self) -> &[StatementId] {
        &self.statements
    }

    pub fn has_processed(&self, statement: &StatementId) -> bool {
        self.statements.contains(statement)
    }

    pub(crate) fn ensure_unprocessed(&self, statement: &StatementId) -> Result<(), DataValidationError> {
        if self.has_processed(statement) {
            return Err(DataValidationError::DuplicateStatement(statement.clone()));
        }
        Ok(())
    }

    pub(crate) fn record_statement(&mut self, statement: StatementId) {
        self.statements.push(statement);
    }

    pub(crate) fn record_claim(&mut self, id: SourceId, claim: Claim) {
        self.claims.insert(id, claim);
    }
}
