//! Amount extraction for expense forms.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::patterns::TOTAL_TO_PAY;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::expense::Amount;

/// "TOTAL A PAYER" amount extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Amount>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in TOTAL_TO_PAY.captures_iter(text) {
            let (Some(full_match), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            match Amount::parse(value.as_str()) {
                Ok(amount) => results.push(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                ),
                Err(e) => trace!("Skipping amount: {}", e),
            }
        }

        results
    }
}

/// Extract every amount to pay from a page, in reading order.
pub fn extract_amounts(text: &str) -> Vec<Amount> {
    AmountExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Largest number of integer digits accepted in an amount.
pub const MAX_INTEGER_DIGITS: usize = 15;

/// Parse an amount such as "125,50", "1 234.5" or "1.234,56".
///
/// Amounts with more than [`MAX_INTEGER_DIGITS`] integer digits are rejected.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    // Drop grouping spaces and non-breaking spaces
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // The separator that comes last is the decimal one
        match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            _ => cleaned,
        }
    } else {
        cleaned
    };

    let integer_digits = normalized.split('.').next().map_or(0, str::len);
    if integer_digits > MAX_INTEGER_DIGITS {
        trace!("Amount {} has {} integer digits", s, integer_digits);
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("125,50"), Some(dec("125.50")));
        assert_eq!(parse_amount("125.50"), Some(dec("125.50")));
        assert_eq!(parse_amount("42"), Some(dec("42")));
        assert_eq!(parse_amount("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_oversized_amount_is_rejected() {
        assert_eq!(parse_amount("79228162514264337593543950335"), None);
        assert_eq!(parse_amount("1234567890123456,00"), None);
        assert_eq!(
            parse_amount("999999999999999,99"),
            Some(dec("999999999999999.99"))
        );

        let text = "TOTAL A PAYER = 79228162514264337593543950335\nTOTAL A PAYER = 1";
        let amounts = extract_amounts(text);
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].value, dec("1"));
    }

    #[test]
    fn test_extract_amounts_in_order() {
        let text = "FRAIS DE ROUTE\nTOTAL A PAYER = 125,50\nREPAS\nTOTAL A PAYER = 30\n";

        let amounts = extract_amounts(text);
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].raw, "125,50");
        assert_eq!(amounts[0].value, dec("125.50"));
        assert_eq!(amounts[1].value, dec("30"));
    }

    #[test]
    fn test_extract_amount_variants() {
        let text = "Total to pay: 1 234.00\ntotal à payer =12.5";

        let amounts = extract_amounts(text);
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].value, dec("1234.00"));
        assert_eq!(amounts[1].value, dec("12.5"));
    }

    #[test]
    fn test_label_without_value_is_ignored() {
        assert!(extract_amounts("TOTAL A PAYER = ").is_empty());
        assert!(extract_amounts("MONTANT = 12,00").is_empty());
    }

    #[test]
    fn test_match_position() {
        let text = "xx TOTAL A PAYER = 5";
        let found = AmountExtractor::new().extract(text).unwrap();
        assert_eq!(found.position, Some((3, text.len())));
        assert_eq!(found.source, "TOTAL A PAYER = 5");
    }
}
