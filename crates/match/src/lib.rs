//! Matches credit-card statement transactions to receipts.
//!
//! Pure engine crate: callers hand in already-parsed statements and
//! receipts and get labeled results back. No IO.

pub mod assign;
pub mod ledger;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod scorer;
pub mod unmatched;
pub(crate) mod util;

pub use assign::{assign, best_candidate};
pub use ledger::{label, CandidatePool, Claim, Labeler, Ledger};
pub use normalize::normalize;
pub use reconcile::{Reconciler, RunReport, StatementOutcome, StatementReport, StatementSummary};
pub use report::{MatchRow, UnmatchedReceiptRow};
pub use scorer::{score, text_similarity, PairScore};
pub use unmatched::unmatched;
