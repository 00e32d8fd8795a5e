//! Ticker list parsing.

use crate::domain::error::TickerError;
use std::collections::HashSet;

/// Symbols polled when no list is configured.
pub const DEFAULT_TICKERS: &[&str] = &[
    "BA", "CAT", "CVX", "CSCO", "KO", "DOW", "GS", "HD", "HON", "IBM", "INTC", "JNJ", "JPM",
    "MCD", "MRK", "MSFT", "NKE", "PG", "CRM", "TRV", "UNH", "VZ", "V", "WMT", "WBA", "DIS",
    "NVDA", "GOOGL", "META", "BRK-A", "BRK-B", "TSLA", "AVGO", "LLY", "NFLX", "SAP", "ASML",
    "BABA", "LIN", "MMM", "AXP", "AMGN", "AAPL", "AMD",
];

pub fn default_tickers() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Split a comma-separated list into upper-cased symbols, rejecting blank
/// entries and repeats.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, TickerError> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(|token| match token.trim() {
            "" => Err(TickerError::EmptyToken),
            symbol => Ok(symbol.to_uppercase()),
        })
        .map(|symbol| {
            symbol.and_then(|s| {
                if seen.insert(s.clone()) {
                    Ok(s)
                } else {
                    Err(TickerError::Duplicate(s))
                }
            })
        })
        .collect()
}
