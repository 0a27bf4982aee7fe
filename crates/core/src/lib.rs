pub mod config;
pub mod error;
pub mod match_result;
pub mod money;
pub mod receipt;
pub mod transaction;

pub use config::MatchConfig;
pub use error::{ConfigError, DataValidationError, ReconcileError};
pub use match_result::MatchResult;
pub use money::{Money, ParseMoneyError};
pub use receipt::{FileRef, Receipt, SourceId};
pub use transaction::{RawTransaction, Statement, StatementId, Transaction};
