use std::fmt;

use reckon_core::{ConfigError, MatchConfig, MatchResult, Receipt, ReconcileError, Statement, StatementId};
use serde::Serialize;

use crate::assign::assign;
use crate::ledger::{CandidatePool, Ledger};
use crate::report::{MatchRow, UnmatchedReceiptRow};
use crate::unmatched::unmatched;

/// Results of one successfully processed statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    pub statement: StatementId,
    pub results: Vec<MatchResult>,
}

impl StatementReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn matched(&self) -> usize {
        self.results.iter().filter(|r| r.is_matched()).count()
    }

    pub fn unmatched(&self) -> usize {
        self.total() - self.matched()
    }

    pub fn summary(&self) -> StatementSummary {
        StatementSummary {
            statement: self.statement.clone(),
            total: self.total(),
            matched: self.matched(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub statement: StatementId,
    pub total: usize,
    pub matched: usize,
}

impl fmt::Display for StatementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {total} of {total} transactions for statement {}, {} unmatched",
            self.statement,
            self.total - self.matched,
            total = self.total,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatementOutcome {
    Completed(StatementReport),
    Failed {
        statement: StatementId,
        total: usize,
        reason: String,
    },
}

impl StatementOutcome {
    pub fn statement(&self) -> &StatementId {
        match self {
            StatementOutcome::Completed(report) => &report.statement,
            StatementOutcome::Failed { statement, .. } => statement,
        }
    }

    pub fn report(&self) -> Option<&StatementReport> {
        match self {
            StatementOutcome::Completed(report) => Some(report),
            StatementOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for StatementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementOutcome::Completed(report) => write!(f, "{}", report.summary()),
            StatementOutcome::Failed { statement, total, reason } => write!(
                f,
                "processed 0 of {total} transactions for statement {statement}: {reason}"
            ),
        }
    }
}

/// Drives one reconciliation run: statements in call order over a single
/// candidate pool, then the unmatched receipts once the run is finished.
#[derive(Debug)]
pub struct Reconciler {
    config: MatchConfig,
    receipts: Vec<Receipt>,
    pool: CandidatePool,
    ledger: Ledger,
    outcomes: Vec<StatementOutcome>,
}

impl Reconciler {
    pub fn new(config: MatchConfig, receipts: Vec<Receipt>) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = CandidatePool::new(receipts);
        tracing::info!(receipts = pool.len(), threshold = config.match_threshold, "reconciliation started");
        Ok(Self {
            receipts: pool.iter().cloned().collect(),
            config,
            pool,
            ledger: Ledger::new(),
            outcomes: Vec::new(),
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn outcomes(&self) -> &[StatementOutcome] {
        &self.outcomes
    }

    /// Process the next statement. A rejected statement is recorded as failed
    /// and leaves the pool untouched; the caller decides whether to go on.
    pub fn process(&mut self, statement: &Statement) -> Result<StatementSummary, ReconcileError> {
        match assign(statement, &mut self.pool, &mut self.ledger, &self.config) {
            Ok(results) => {
                let report = StatementReport {
                    statement: statement.id.clone(),
                    results,
                };
                let summary = report.summary();
                tracing::info!("{summary}");
                self.outcomes.push(StatementOutcome::Completed(report));
                Ok(summary)
            }
            Err(source) => {
                let err = ReconcileError {
                    statement: statement.id.clone(),
                    total: statement.len(),
                    source,
                };
                tracing::warn!("{err}");
                self.outcomes.push(StatementOutcome::Failed {
                    statement: err.statement.clone(),
                    total: err.total,
                    reason: err.source.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Close the run and collect the receipts no statement claimed.
    pub fn finish(self) -> RunReport {
        let unmatched = unmatched(
            &self.receipts,
            self.outcomes
                .iter()
                .filter_map(StatementOutcome::report)
                .flat_map(|report| report.results.iter()),
        );
        tracing::info!(
            statements = self.outcomes.len(),
            claimed = self.ledger.claimed_count(),
            unmatched = unmatched.len(),
            "reconciliation finished"
        );
        RunReport {
            statements: self.outcomes,
            unmatched,
        }
    }
}

/// Everything a run produced, ready for report writers.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub statements: Vec<StatementOutcome>,
    pub unmatched: Vec<Receipt>,
}

impl RunReport {
    pub fn results(&self) -> impl Iterator<Item = &MatchResult> {
        self.statements
            .iter()
            .filter_map(StatementOutcome::report)
            .flat_map(|report| report.results.iter())
    }

    pub fn failed(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.statements
            .iter()
            .filter(|o| matches!(o, StatementOutcome::Failed { .. }))
    }

    pub fn match_rows(&self) -> Vec<MatchRow> {
        self.results().map(MatchRow::from).collect()
    }

    pub fn unmatched_rows(&self) -> Vec<UnmatchedReceiptRow> {
        self.unmatched.iter().map(UnmatchedReceiptRow::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_core::{FileRef, RawTransaction};

    fn line(statement: &str, seq: Option<u32>, desc: &str, amount: &str) -> RawTransaction {
        RawTransaction {
            statement_id: StatementId::from(statement),
            sequence_index: seq,
            date: Some("2024-01-15".into()),
            description: Some(desc.into()),
            amount: Some(amount.into()),
        }
    }

    fn receipt(id: &str, merchant: &str, amount: &str) -> Receipt {
        Receipt::from_extracted(id, Some(merchant), Some(amount), None, FileRef::new(id))
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = MatchConfig::default().with_threshold(120);
        assert!(matches!(
            Reconciler::new(config, Vec::new()),
            Err(ConfigError::ThresholdOutOfRange(120))
        ));
    }

    #[test]
    fn summary_reads_processed_counts() {
        let mut run = Reconciler::new(
            MatchConfig::default(),
            vec![receipt("r1", "Amazon", "42.17")],
        )
        .unwrap();
        let summary = run
            .process(&Statement::new(
                "amex",
                vec![
                    line("amex", Some(1), "AMAZON", "-42.17"),
                    line("amex", Some(2), "TARGET", "-9.99"),
                ],
            ))
            .unwrap();
        assert_eq!(
            summary.to_string(),
            "processed 2 of 2 transactions for statement amex, 1 unmatched"
        );
    }

    #[test]
    fn failed_statement_is_recorded_and_run_continues() {
        let mut run = Reconciler::new(
            MatchConfig::default(),
            vec![receipt("r1", "Amazon", "42.17")],
        )
        .unwrap();

        let err = run
            .process(&Statement::new(
                "chase",
                vec![
                    line("chase", Some(1), "AMAZON", "-42.17"),
                    line("chase", None, "TARGET", "-9.99"),
                ],
            ))
            .unwrap_err();
        assert!(err.to_string().starts_with("processed 0 of 2 transactions for statement chase:"));
        assert_eq!(run.pool().len(), 1);

        run.process(&Statement::new("amex", vec![line("amex", Some(1), "AMAZON", "-42.17")]))
            .unwrap();

        let report = run.finish();
        assert_eq!(report.statements.len(), 2);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(
            report.statements[0].to_string(),
            "processed 0 of 2 transactions for statement chase: \
             statement chase, row 2: missing required field 'sequence_index'"
        );
        assert_eq!(report.results().count(), 1);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn finish_reports_leftovers_after_all_statements() {
        let mut run = Reconciler::new(
            MatchConfig::default(),
            vec![
                receipt("r1", "Netflix", "15.49"),
                receipt("r2", "Amazon", "42.17"),
            ],
        )
        .unwrap();
        run.process(&Statement::new("amex", vec![line("amex", Some(1), "AMAZON", "-42.17")]))
            .unwrap();
        let report = run.finish();
        let ids: Vec<_> = report.unmatched.iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, ["r1"]);
        assert_eq!(report.unmatched_rows().len(), 1);
        assert_eq!(report.match_rows().len(), 1);
    }
}
