use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use reckon_core::MatchConfig;
use reckon_match::{MatchRow, Reconciler, RunReport, StatementOutcome, UnmatchedReceiptRow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod load;

#[derive(Parser)]
#[command(name = "reckon")]
#[command(about = "Match credit-card statement lines to emailed receipts")]
struct Args {
    /// Matching configuration (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Receipts CSV: source_id,merchant,amount,date,file_reference
    #[arg(short, long)]
    receipts: PathBuf,

    /// Statement CSVs (sequence_index,date,description,amount), matched in
    /// the order given. The file stem is the statement id.
    #[arg(required = true)]
    statements: Vec<PathBuf>,

    /// Override match_threshold from the config
    #[arg(long)]
    threshold: Option<u8>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Exit with an error if any statement was rejected
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
struct Output {
    statements: Vec<OutcomeLine>,
    matches: Vec<MatchRow>,
    unmatched: Vec<UnmatchedReceiptRow>,
}

#[derive(Serialize)]
struct OutcomeLine {
    statement: String,
    ok: bool,
    message: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.match_threshold = threshold;
    }

    let receipts = load::read_receipts(&args.receipts)
        .with_context(|| format!("reading receipts {}", args.receipts.display()))?;
    let mut reconciler = Reconciler::new(config, receipts)?;

    for path in &args.statements {
        process_file(&mut reconciler, path)?;
    }

    let report = reconciler.finish();
    let failed = report.failed().count();
    let output = render(&report);

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");

    if args.strict && failed > 0 {
        bail!("{failed} statement(s) rejected");
    }
    Ok(())
}

/// Load errors abort the run. A rejected statement is already recorded in
/// the run report, so matching moves on to the next file.
fn process_file(reconciler: &mut Reconciler, path: &Path) -> Result<()> {
    let statement =
        load::read_statement(path).with_context(|| format!("reading statement {}", path.display()))?;
    tracing::debug!(path = %path.display(), lines = statement.len(), "statement loaded");
    if let Err(err) = reconciler.process(&statement) {
        tracing::debug!(path = %path.display(), %err, "statement rejected, continuing");
    }
    Ok(())
}

fn render(report: &RunReport) -> Output {
    Output {
        statements: report
            .statements
            .iter()
            .map(|outcome| OutcomeLine {
                statement: outcome.statement().to_string(),
                ok: matches!(outcome, StatementOutcome::Completed(_)),
                message: outcome.to_string(),
            })
            .collect(),
        matches: report.match_rows(),
        unmatched: report.unmatched_rows(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_core::{RawTransaction, Statement, StatementId};

    #[test]
    fn render_lists_every_statement_outcome() {
        let receipts = load::parse_receipts(
            "source_id,merchant,amount,date,file_reference\nr1,Amazon,42.17,,drive://r1\nr2,Shell,48.00,,drive://r2\n"
                .as_bytes(),
        )
        .unwrap();
        let mut reconciler = Reconciler::new(MatchConfig::default().with_label("amex", "Amex"), receipts).unwrap();

        let good = load::parse_statement(
            StatementId::from("amex"),
            "sequence_index,date,description,amount\n1,2024-01-15,AMAZON.COM*AB12CD,-42.17\n".as_bytes(),
        )
        .unwrap();
        let bad = Statement::new(
            "chase",
            vec![RawTransaction {
                statement_id: StatementId::from("chase"),
                sequence_index: Some(1),
                date: None,
                description: Some("SHELL".into()),
                amount: Some("-48.00".into()),
            }],
        );
        reconciler.process(&good).unwrap();
        assert!(reconciler.process(&bad).is_err());

        let output = render(&reconciler.finish());
        assert_eq!(output.statements.len(), 2);
        assert!(output.statements[0].ok);
        assert_eq!(
            output.statements[0].message,
            "processed 1 of 1 transactions for statement amex, 0 unmatched"
        );
        assert!(!output.statements[1].ok);
        assert!(output.statements[1].message.starts_with("processed 0 of 1"));
        assert_eq!(output.matches.len(), 1);
        assert_eq!(output.matches[0].label, "Amex_001");
        assert_eq!(output.unmatched.len(), 1);
        assert_eq!(output.unmatched[0].receipt_id, "r2");
    }

    #[test]
    fn rejected_file_does_not_stop_later_files() {
        let dir = tempfile::tempdir().unwrap();
        let chase = dir.path().join("chase.csv");
        std::fs::write(&chase, "sequence_index,date,description,amount\n1,,SHELL,-48.00\n").unwrap();
        let amex = dir.path().join("amex.csv");
        std::fs::write(&amex, "sequence_index,date,description,amount\n1,2024-01-15,AMAZON,-42.17\n").unwrap();

        let receipts = load::parse_receipts(
            "source_id,merchant,amount,date,file_reference\nr1,Amazon,42.17,,drive://r1\n".as_bytes(),
        )
        .unwrap();
        let mut reconciler = Reconciler::new(MatchConfig::default(), receipts).unwrap();
        process_file(&mut reconciler, &chase).unwrap();
        process_file(&mut reconciler, &amex).unwrap();

        let report = reconciler.finish();
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.results().count(), 1);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn unreadable_file_aborts() {
        let mut reconciler = Reconciler::new(MatchConfig::default(), Vec::new()).unwrap();
        assert!(process_file(&mut reconciler, Path::new("/nonexistent/amex.csv")).is_err());
        assert!(reconciler.outcomes().is_empty());
    }
}
