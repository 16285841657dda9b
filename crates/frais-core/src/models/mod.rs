//! Data models for expense records and configuration.

pub mod config;
pub mod expense;
