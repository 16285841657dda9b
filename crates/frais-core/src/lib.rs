//! Core library for travel-expense form extraction.
//!
//! This crate provides:
//! - PDF processing (per-page text extraction)
//! - Form-type detection (A4 four-page vs. A3 two-page forms)
//! - Agent grouping and field extraction (name, first name, amounts, pages)
//! - Tabular export (XLSX, CSV, JSON)

pub mod error;
pub mod export;
pub mod expense;
pub mod models;
pub mod pdf;
pub mod pipeline;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{FraisError, Result};
pub use export::ExpenseTable;
pub use expense::{AgentGroup, ExpenseParser, FormClassifier, FormType, RecordExtractor};
pub use models::config::FraisConfig;
pub use models::expense::{AgentRecord, Amount, DocumentResult};
pub use pdf::{PdfContent, PdfExtractor, PdfPage, PdfProcessor, PdfType};
pub use pipeline::ExpensePipeline;
