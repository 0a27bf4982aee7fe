use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::money::Money;
use super::transaction::parse_date;

/// Unique identifier of a receipt, usually derived from its originating
/// email and attachment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Derive a stable id from an email id plus the attachment it carried.
    ///
    /// The same attachment fetched twice maps to the same id, while two
    /// attachments with identical bytes in different emails stay distinct.
    pub fn from_attachment(email_id: &str, file_name: &str, content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(file_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(content);
        let digest: [u8; 32] = hasher.finalize().into();
        SourceId(format!("{email_id}:{}", &to_hex(&digest)[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        SourceId(s.to_string())
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        SourceId(s)
    }
}

/// Opaque handle to the underlying document in the external store.
/// Carried through to reports, never opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(handle: impl Into<String>) -> Self {
        FileRef(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed purchase document. Merchant, amount and date are best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub source_id: SourceId,
    pub merchant: String,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub file_reference: FileRef,
}

impl Receipt {
    /// Build a receipt from raw extracted text. Amounts or dates that do not
    /// parse are recorded as unknown rather than zero.
    pub fn from_extracted(
        source_id: impl Into<SourceId>,
        merchant: Option<&str>,
        amount: Option<&str>,
        date: Option<&str>,
        file_reference: FileRef,
    ) -> Self {
        Receipt {
            source_id: source_id.into(),
            merchant: merchant.map(str::trim).unwrap_or_default().to_string(),
            amount: amount.and_then(|a| a.parse::<Money>().ok()),
            date: date.and_then(parse_date),
            file_reference,
        }
    }

    /// Neither merchant nor amount could be extracted.
    pub fn is_low_confidence(&self) -> bool {
        self.merchant.trim().is_empty() && self.amount.is_none()
    }
}

fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_is_stable() {
        let a = SourceId::from_attachment("msg-17", "receipt.pdf", b"%PDF-1.7 ...");
        let b = SourceId::from_attachment("msg-17", "receipt.pdf", b"%PDF-1.7 ...");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("msg-17:"));
        assert_eq!(a.as_str().len(), "msg-17:".len() + 16);
    }

    #[test]
    fn source_id_distinguishes_emails_and_files() {
        let base = SourceId::from_attachment("msg-1", "a.pdf", b"same");
        assert_ne!(base, SourceId::from_attachment("msg-2", "a.pdf", b"same"));
        assert_ne!(base, SourceId::from_attachment("msg-1", "b.pdf", b"same"));
        assert_ne!(base, SourceId::from_attachment("msg-1", "a.pdf", b"other"));
    }

    #[test]
    fn from_extracted_keeps_unparsable_fields_unknown() {
        let r = Receipt::from_extracted(
            "r1",
            Some("  Amazon "),
            Some("about forty"),
            Some("sometime"),
            FileRef::new("drive://r1"),
        );
        assert_eq!(r.merchant, "Amazon");
        assert_eq!(r.amount, None);
        assert_eq!(r.date, None);
        assert!(!r.is_low_confidence());
    }

    #[test]
    fn from_extracted_parses_known_fields() {
        let r = Receipt::from_extracted(
            "r2",
            None,
            Some("$42.17"),
            Some("2024-01-15"),
            FileRef::new("drive://r2"),
        );
        assert_eq!(r.amount, Some(Money::from_cents(4217)));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(r.merchant.is_empty());
    }

    #[test]
    fn empty_receipt_is_low_confidence_but_valid() {
        let r = Receipt::from_extracted("r3", None, None, None, FileRef::new("drive://r3"));
        assert!(r.is_low_confidence());
    }
}
