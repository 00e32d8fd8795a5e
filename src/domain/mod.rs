//! Core domain types and logic for sentiment ingestion.

pub mod sentiment;
pub mod article;
pub mod tickers;
pub mod merge;
pub mod aggregate;
pub mod ingest;
pub mod config_validation;
pub mod error;

