//! Agent name extraction.

use regex::{Captures, Regex};

use super::patterns::{AGENT_NAME, FIRST_NAME, FIRST_PREFIX};
use super::{ExtractionMatch, FieldExtractor};

/// Which name label an extractor looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLabel {
    /// NOM / NAME.
    Family,
    /// PRENOM / FIRST NAME.
    First,
}

/// Label-based name extractor.
pub struct NameExtractor {
    label: NameLabel,
}

impl NameExtractor {
    pub fn new(label: NameLabel) -> Self {
        Self { label }
    }

    /// Extractor for the NOM / NAME field.
    pub fn family() -> Self {
        Self::new(NameLabel::Family)
    }

    /// Extractor for the PRENOM / FIRST NAME field.
    pub fn first() -> Self {
        Self::new(NameLabel::First)
    }

    fn pattern(&self) -> &'static Regex {
        match self.label {
            NameLabel::Family => &AGENT_NAME,
            NameLabel::First => &FIRST_NAME,
        }
    }

    fn to_match(&self, text: &str, caps: &Captures<'_>) -> Option<ExtractionMatch<String>> {
        let full_match = caps.get(0)?;
        let value = caps.get(1)?;

        // "NAME" preceded by "FIRST" is the first-name label
        if self.label == NameLabel::Family && FIRST_PREFIX.is_match(&text[..full_match.start()]) {
            return None;
        }

        let followed_by_label = text[value.end()..].starts_with(':');
        let name = clean_name(value.as_str(), followed_by_label);
        if name.is_empty() {
            return None;
        }

        Some(
            ExtractionMatch::new(name, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern()
            .captures_iter(text)
            .find_map(|caps| self.to_match(text, &caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern()
            .captures_iter(text)
            .filter_map(|caps| self.to_match(text, &caps))
            .collect()
    }
}

/// Trim a captured name and collapse inner whitespace.
///
/// A capture that runs into the next label on the same line
/// ("DUPONT PRENOM" before ":") loses that trailing label word.
fn clean_name(raw: &str, followed_by_label: bool) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();

    if followed_by_label {
        words.pop();
        if words
            .last()
            .is_some_and(|w| w.eq_ignore_ascii_case("first"))
        {
            words.pop();
        }
    }

    words.join(" ")
}

/// Extract the agent family name from page text.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::family().extract(text).map(|m| m.value)
}

/// Extract the agent first name from page text.
pub fn extract_first_name(text: &str) -> Option<String> {
    NameExtractor::first().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("NOM : DUPONT\n"), Some("DUPONT".to_string()));
        assert_eq!(extract_name("Name:Smith"), Some("Smith".to_string()));
        assert_eq!(extract_name("NOM: LE  GALL \n"), Some("LE GALL".to_string()));
        assert_eq!(extract_name("nothing here"), None);
    }

    #[test]
    fn test_name_stops_at_line_end() {
        let text = "NOM : DUPONT\nPRENOM : JEAN\n";
        assert_eq!(extract_name(text), Some("DUPONT".to_string()));
        assert_eq!(extract_first_name(text), Some("JEAN".to_string()));
    }

    #[test]
    fn test_prenom_is_not_a_family_name() {
        let text = "PRENOM : JEAN\nNOM : DUPONT";
        assert_eq!(extract_name(text), Some("DUPONT".to_string()));
    }

    #[test]
    fn test_first_name_label_is_not_a_family_name() {
        let text = "FIRST NAME: JOHN\nNAME: DOE";
        assert_eq!(extract_name(text), Some("DOE".to_string()));
        assert_eq!(extract_first_name(text), Some("JOHN".to_string()));
    }

    #[test]
    fn test_surname_label() {
        let text = "SURNAME: SMITH\nFIRST NAME: JOHN";
        assert_eq!(extract_name(text), Some("SMITH".to_string()));
        assert_eq!(extract_first_name(text), Some("JOHN".to_string()));
        assert_eq!(extract_name("Surname : Le Gall"), Some("Le Gall".to_string()));
    }

    #[test]
    fn test_labels_on_one_line() {
        let text = "NOM : DUPONT   PRENOM : JEAN";
        assert_eq!(extract_name(text), Some("DUPONT".to_string()));
        assert_eq!(extract_first_name(text), Some("JEAN".to_string()));

        let text = "NAME: DOE FIRST NAME: JOHN";
        assert_eq!(extract_name(text), Some("DOE".to_string()));
        assert_eq!(extract_first_name(text), Some("JOHN".to_string()));
    }

    #[test]
    fn test_accented_and_compound_names() {
        assert_eq!(
            extract_first_name("Prénom : Hélène-Marie"),
            Some("Hélène-Marie".to_string())
        );
        assert_eq!(extract_name("NOM : D'ARTAGNAN"), Some("D'ARTAGNAN".to_string()));
    }

    #[test]
    fn test_extract_all_names() {
        let found = NameExtractor::family().extract_all("NOM : A\nNOM : B\n");
        let names: Vec<_> = found.into_iter().map(|m| m.value).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
