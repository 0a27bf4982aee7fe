use reckon_core::{Money, Receipt, Transaction};

use crate::normalize::normalize;
use crate::util::similarity_ratio;

/// How well one receipt fits one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairScore {
    /// Normalized merchant similarity, 0..=100.
    pub text_score: u8,
    /// Amounts agree within tolerance, or the receipt amount is unknown.
    pub amount_ok: bool,
    /// `None` when the receipt amount is unknown.
    pub amount_difference: Option<Money>,
}

impl PairScore {
    pub fn is_eligible(&self, match_threshold: u8) -> bool {
        self.amount_ok && self.text_score >= match_threshold
    }
}

/// Score a (transaction, receipt) pair. Pure and infallible.
pub fn score(tx: &Transaction, receipt: &Receipt, amount_tolerance: Money) -> PairScore {
    let text_score = text_similarity(&tx.description, &receipt.merchant);
    let amount_difference = receipt
        .amount
        .map(|amount| tx.amount.magnitude_difference(amount));
    let amount_ok = amount_difference.map_or(true, |diff| diff <= amount_tolerance);

    PairScore {
        text_score,
        amount_ok,
        amount_difference,
    }
}

/// Similarity of two merchant strings after normalization.
pub fn text_similarity(a: &str, b: &str) -> u8 {
    similarity_ratio(&normalize(a), &normalize(b))
}
