//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::FraisError;

/// Main configuration for the frais pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FraisConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Form-type detection configuration.
    pub form: FormConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Tabular export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider a PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Form-type detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Substrings that must all appear on the first page of an A3 form.
    pub markers: Vec<String>,

    /// Page count from which a document is always treated as A4 four-page.
    pub a4_min_pages: u32,

    /// Minimum page count for an A3 two-page form.
    pub a3_min_pages: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            markers: vec!["VERIFIE LE".to_string(), "PAIE".to_string()],
            a4_min_pages: 4,
            a3_min_pages: 2,
        }
    }
}

/// Which pages of an agent group are scanned for amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountScope {
    /// Only the first page of the group.
    #[default]
    FirstPage,
    /// Every page of the group, in page order.
    AllPages,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages scanned for "TOTAL A PAYER" amounts.
    pub amount_scope: AmountScope,

    /// Group key for pages that carry no agent name.
    pub default_agent: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            amount_scope: AmountScope::FirstPage,
            default_agent: "Default Agent".to_string(),
        }
    }
}

/// Tabular export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Worksheet name used for XLSX output.
    pub sheet_name: String,

    /// Excel number format applied to amount and total cells.
    pub number_format: String,

    /// CSV field delimiter.
    pub csv_delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Frais".to_string(),
            number_format: "0.00".to_string(),
            csv_delimiter: ',',
        }
    }
}

impl ExportConfig {
    /// CSV delimiter as a single byte.
    pub fn delimiter_byte(&self) -> crate::error::Result<u8> {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                FraisError::Config(format!(
                    "CSV delimiter must be an ASCII character, got {:?}",
                    self.csv_delimiter
                ))
            })
    }
}

impl FraisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
