use regex::Regex;
use std::sync::OnceLock;

/// Words that show up on statements and receipts without identifying the
/// merchant: processor prefixes, domain and company suffixes, and generic
/// transaction vocabulary.
const BOILERPLATE: &[&str] = &[
    // card processor prefixes ("SQ *", "TST*", "SP ")
    "sq", "tst", "sp", "pos", "ach",
    // domains and company suffixes
    "www", "com", "net", "org", "inc", "llc", "ltd", "co", "corp",
    // generic transaction words
    "purchase", "payment", "pmt", "debit", "credit", "card", "store", "online", "recurring",
    "autopay", "order", "receipt", "the",
];

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator regex"))
}

/// Reduce merchant text to the words that identify the merchant.
///
/// Lower-cases, splits on anything that is not a letter or digit, drops
/// boilerplate words and every token containing a digit (store numbers,
/// reference codes), then joins with single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    separators()
        .split(&lowered)
        .filter(|w| !w.is_empty())
        .filter(|w| !w.chars().any(|c| c.is_numeric()))
        .filter(|w| !BOILERPLATE.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_domain_and_reference_code() {
        assert_eq!(normalize("AMAZON.COM*AB12CD"), "amazon");
    }

    #[test]
    fn strips_processor_prefix() {
        assert_eq!(normalize("SQ *COFFEE SHOP"), "coffee shop");
        assert_eq!(normalize("TST* Joe's Diner"), "joe s diner");
    }

    #[test]
    fn strips_store_numbers() {
        assert_eq!(normalize("STARBUCKS STORE #12345"), "starbucks");
        assert_eq!(normalize("SHELL OIL 57444"), "shell oil");
    }

    #[test]
    fn strips_generic_words() {
        assert_eq!(normalize("Online Payment - Thank You"), "thank you");
        assert_eq!(normalize("POS PURCHASE Whole Foods"), "whole foods");
    }

    #[test]
    fn collapses_whitespace_and_punctuation() {
        assert_eq!(normalize("  Blue   Bottle,,, Coffee  "), "blue bottle coffee");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(normalize("Café Müller"), "café müller");
    }

    #[test]
    fn all_boilerplate_is_empty() {
        assert_eq!(normalize("PAYMENT 0042"), "");
        assert_eq!(normalize(""), "");
    }
}
