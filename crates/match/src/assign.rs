use std::cmp::Ordering;

use reckon_core::{DataValidationError, MatchConfig, MatchResult, Money, Receipt, SourceId, Statement, Transaction};
use tracing::{debug, info, instrument};

use crate::ledger::{CandidatePool, Claim, Ledger, Labeler};
use crate::scorer::{score, PairScore};

/// Match one statement against the receipts still in `pool`.
///
/// Transactions are visited in `sequence_index` order and each one claims
/// its best eligible receipt immediately, so earlier transactions win
/// contested receipts. Claimed receipts leave `pool` and are recorded in
/// `ledger`. Returns exactly one result per transaction, in order.
///
/// The batch is validated before anything is claimed: on error neither the
/// pool nor the ledger changes.
#[instrument(skip_all, fields(statement = %statement.id, transactions = statement.len()))]
pub fn assign(
    statement: &Statement,
    pool: &mut CandidatePool,
    ledger: &mut Ledger,
    config: &MatchConfig,
) -> Result<Vec<MatchResult>, DataValidationError> {
    ledger.ensure_unprocessed(&statement.id)?;
    let transactions = statement.validate()?;
    ledger.record_statement(statement.id.clone());

    let mut labels = Labeler::new(config.label_prefix(&statement.id), config.label_width);
    let mut results = Vec::with_capacity(transactions.len());

    for tx in transactions {
        let label = labels.next_label();
        let pick = best_candidate(&tx, pool, config).map(|(receipt, s)| (receipt.source_id.clone(), s));

        let result = match pick.and_then(|(id, s)| pool.take(&id).map(|receipt| (receipt, s))) {
            Some((receipt, s)) => {
                debug!(
                    label = %label,
                    source_id = %receipt.source_id,
                    text_score = s.text_score,
                    "receipt claimed"
                );
                ledger.record_claim(
                    receipt.source_id.clone(),
                    Claim {
                        statement: statement.id.clone(),
                        label: label.clone(),
                    },
                );
                MatchResult::matched(tx, receipt, s.text_score, s.amount_difference, label)
            }
            None => MatchResult::unmatched(tx, label),
        };
        results.push(result);
    }

    let matched = results.iter().filter(|r| r.is_matched()).count();
    info!(
        matched,
        unmatched = results.len() - matched,
        remaining_receipts = pool.len(),
        "statement reconciled"
    );
    Ok(results)
}

/// Highest-ranked eligible receipt for `tx`, if any.
pub fn best_candidate<'p>(
    tx: &Transaction,
    pool: &'p CandidatePool,
    config: &MatchConfig,
) -> Option<(&'p Receipt, PairScore)> {
    pool.iter()
        .map(|receipt| (receipt, score(tx, receipt, config.amount_tolerance)))
        .filter(|(_, s)| s.is_eligible(config.match_threshold))
        .min_by(|a, b| rank(a, b))
}

/// Better candidates order first: higher text score, then smaller known
/// amount difference (unknown sorts last), then smaller `source_id`.
fn rank(a: &(&Receipt, PairScore), b: &(&Receipt, PairScore)) -> Ordering {
    b.1.text_score
        .cmp(&a.1.text_score)
        .then_with(|| compare_difference(a.1.amount_difference, b.1.amount_difference))
        .then_with(|| compare_ids(&a.0.source_id, &b.0.source_id))
}

fn compare_difference(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_ids(a: &SourceId, b: &SourceId) -> Ordering {
    a.as_str().cmp(b.as_str())
}
