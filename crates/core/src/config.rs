use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::ConfigError;
use super::money::Money;
use super::transaction::StatementId;

pub const DEFAULT_MATCH_THRESHOLD: u8 = 85;
pub const DEFAULT_LABEL_WIDTH: usize = 3;

/// Matching knobs for one reconciliation run.
///
/// ```toml
/// match_threshold = 85
/// amount_tolerance = "1.00"
/// label_width = 3
///
/// [labels]
/// amex = "Amex"
/// chase = "Chase"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Minimum text similarity (0..=100) to accept a match.
    pub match_threshold: u8,
    /// Largest accepted difference between transaction and receipt amounts,
    /// rounded to cents when read.
    pub amount_tolerance: Money,
    pub label_width: usize,
    /// Statement id -> label prefix. Unlisted statements use their id.
    pub labels: BTreeMap<String, String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            amount_tolerance: Money::from_cents(100),
            label_width: DEFAULT_LABEL_WIDTH,
            labels: BTreeMap::new(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange(self.match_threshold));
        }
        if self.amount_tolerance.is_negative() {
            return Err(ConfigError::NegativeTolerance(self.amount_tolerance));
        }
        if !(1..=9).contains(&self.label_width) {
            return Err(ConfigError::LabelWidth(self.label_width));
        }
        if let Some((statement, _)) = self.labels.iter().find(|(_, p)| p.trim().is_empty()) {
            return Err(ConfigError::EmptyLabelPrefix(statement.clone()));
        }
        Ok(())
    }

    pub fn with_threshold(mut self, match_threshold: u8) -> Self {
        self.match_threshold = match_threshold;
        self
    }

    pub fn with_label(mut self, statement: &str, prefix: &str) -> Self {
        self.labels.insert(statement.to_string(), prefix.to_string());
        self
    }

    pub fn label_prefix<'a>(&'a self, statement: &'a StatementId) -> &'a str {
        self.labels
            .get(statement.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| statement.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = MatchConfig::from_toml("").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.match_threshold, 85);
        assert_eq!(config.amount_tolerance, Money::from_cents(100));
        assert_eq!(config.label_width, 3);
    }

    #[test]
    fn parses_full_document() {
        let config = MatchConfig::from_toml(
            r#"
match_threshold = 90
amount_tolerance = "0.50"
label_width = 4

[labels]
amex = "Amex"
meriwest = "Meriwest"
"#,
        )
        .unwrap();
        assert_eq!(config.match_threshold, 90);
        assert_eq!(config.amount_tolerance, Money::from_cents(50));
        assert_eq!(config.label_width, 4);
        assert_eq!(config.label_prefix(&StatementId::from("amex")), "Amex");
        assert_eq!(config.label_prefix(&StatementId::from("chase")), "chase");
    }

    #[test]
    fn accepts_numeric_tolerance() {
        let config = MatchConfig::from_toml("amount_tolerance = 2").unwrap();
        assert_eq!(config.amount_tolerance, Money::from_cents(200));
    }

    #[test]
    fn tolerance_is_rounded_to_cents() {
        let config = MatchConfig::from_toml(r#"amount_tolerance = "0.499""#).unwrap();
        assert_eq!(config.amount_tolerance, Money::from_cents(50));
    }

    #[test]
    fn rejects_threshold_above_100() {
        let err = MatchConfig::from_toml("match_threshold = 101").unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange(101)));
    }

    #[test]
    fn rejects_negative_threshold_at_parse() {
        let err = MatchConfig::from_toml("match_threshold = -5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_negative_tolerance() {
        let err = MatchConfig::from_toml(r#"amount_tolerance = "-0.01""#).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeTolerance(_)));
    }

    #[test]
    fn rejects_bad_label_width() {
        assert!(matches!(
            MatchConfig::from_toml("label_width = 0").unwrap_err(),
            ConfigError::LabelWidth(0)
        ));
    }

    #[test]
    fn rejects_empty_prefix() {
        let err = MatchConfig::from_toml("[labels]\namex = \" \"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLabelPrefix(ref s) if s == "amex"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(MatchConfig::from_toml("threshold = 80").is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "match_threshold = 70").unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert_eq!(config.match_threshold, 70);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = MatchConfig::load(Path::new("/nonexistent/reckon.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
