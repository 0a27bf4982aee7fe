use std::collections::HashSet;

use reckon_core::{MatchResult, Receipt, SourceId};

/// Receipts that no result claimed, in their original discovery order.
///
/// Only meaningful once every statement of the run has been processed; a
/// receipt left over after an early statement may still be claimed later.
pub fn unmatched<'a, I>(all_receipts: &[Receipt], results: I) -> Vec<Receipt>
where
    I: IntoIterator<Item = &'a MatchResult>,
{
    let claimed: HashSet<&SourceId> = results.into_iter().filter_map(MatchResult::receipt_id).collect();
    let mut reported = HashSet::new();
    let mut leftovers = Vec::new();

    for receipt in all_receipts {
        if !claimed.contains(&receipt.source_id) && reported.insert(&receipt.source_id) {
            leftovers.push(receipt.clone());
        }
    }

    leftovers
}
