//! Form-type detection from page count and first-page markers.

use tracing::debug;

use crate::models::config::FormConfig;
use crate::models::expense::FormType;

/// Classifies a document as an A4 four-page or A3 two-page form.
#[derive(Debug, Clone)]
pub struct FormClassifier {
    markers: Vec<String>,
    a4_min_pages: u32,
    a3_min_pages: u32,
}

impl FormClassifier {
    /// Create a classifier with the default markers ("VERIFIE LE", "PAIE").
    pub fn new() -> Self {
        Self::from_config(&FormConfig::default())
    }

    /// Create a classifier from configuration.
    pub fn from_config(config: &FormConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            a4_min_pages: config.a4_min_pages,
            a3_min_pages: config.a3_min_pages,
        }
    }

    /// Whether every marker appears in the text.
    pub fn has_markers(&self, text: &str) -> bool {
        self.markers.iter().all(|m| text.contains(m.as_str()))
    }

    /// Detect the form type.
    ///
    /// Documents of `a4_min_pages` pages or more are A4. Shorter documents
    /// of at least `a3_min_pages` pages are A3 when the first page carries
    /// every marker. Anything else falls back to A4.
    pub fn classify(&self, page_count: u32, first_page_text: &str) -> FormType {
        let form_type = if page_count >= self.a4_min_pages {
            FormType::A4FourPages
        } else if page_count >= self.a3_min_pages && self.has_markers(first_page_text) {
            FormType::A3TwoPages
        } else {
            FormType::A4FourPages
        };

        debug!("Form type for {} pages: {}", page_count, form_type);
        form_type
    }
}

impl Default for FormClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the form type with the default classifier.
pub fn detect_form_type(page_count: u32, first_page_text: &str) -> FormType {
    FormClassifier::new().classify(page_count, first_page_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ETAT DE FRAIS\nVERIFIE LE 12/03\nBON POUR PAIE\n";

    #[test]
    fn test_four_pages_is_a4() {
        assert_eq!(detect_form_type(4, HEADER), FormType::A4FourPages);
        assert_eq!(detect_form_type(9, ""), FormType::A4FourPages);
    }

    #[test]
    fn test_two_pages_with_markers_is_a3() {
        assert_eq!(detect_form_type(2, HEADER), FormType::A3TwoPages);
        assert_eq!(detect_form_type(3, HEADER), FormType::A3TwoPages);
    }

    #[test]
    fn test_missing_marker_falls_back_to_a4() {
        assert_eq!(detect_form_type(2, "VERIFIE LE 12/03"), FormType::A4FourPages);
        assert_eq!(detect_form_type(2, "verifie le / paie"), FormType::A4FourPages);
    }

    #[test]
    fn test_single_page_is_a4() {
        assert_eq!(detect_form_type(1, HEADER), FormType::A4FourPages);
    }

    #[test]
    fn test_custom_markers() {
        let config = FormConfig {
            markers: vec!["VISA".to_string()],
            ..FormConfig::default()
        };
        let classifier = FormClassifier::from_config(&config);
        assert_eq!(classifier.classify(2, "VISA DU CHEF"), FormType::A3TwoPages);
        assert_eq!(classifier.classify(2, HEADER), FormType::A4FourPages);
    }
}
