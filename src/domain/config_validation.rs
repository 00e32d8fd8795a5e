//! Configuration validation.
//!
//! Checks every key a run reads before any feed is fetched or file touched.

use crate::domain::aggregate::IngestPolicy;
use crate::domain::article::DedupKey;
use crate::domain::error::PulseError;
use crate::domain::tickers::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono_tz::Tz;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), PulseError> {
    validate_tickers(config)?;
    validate_policy(config)?;
    validate_dedup_key(config)?;
    validate_timezone(config)?;
    validate_storage(config)?;
    validate_feed(config)?;
    validate_classifier(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> PulseError {
    PulseError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), PulseError> {
    match config
        .get_string("ingest", "tickers")
        .filter(|s| !s.trim().is_empty())
    {
        Some(list) => parse_tickers(&list)
            .map(|_| ())
            .map_err(|e| invalid("ingest", "tickers", e.to_string())),
        None => Ok(()),
    }
}

fn validate_policy(config: &dyn ConfigPort) -> Result<(), PulseError> {
    let value = config.get_string_or("ingest", "policy", "cursor");
    value
        .parse::<IngestPolicy>()
        .map(|_| ())
        .map_err(|e| invalid("ingest", "policy", e))
}

fn validate_dedup_key(config: &dyn ConfigPort) -> Result<(), PulseError> {
    let value = config.get_string_or("ingest", "dedup_key", "title");
    value
        .parse::<DedupKey>()
        .map(|_| ())
        .map_err(|e| invalid("ingest", "dedup_key", e))
}

fn validate_timezone(config: &dyn ConfigPort) -> Result<(), PulseError> {
    let value = config.get_string_or("ingest", "timezone", "America/New_York");
    value
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| invalid("ingest", "timezone", format!("unknown IANA timezone '{value}'")))
}

fn validate_storage(config: &dyn ConfigPort) -> Result<(), PulseError> {
    let news = config.get_string_or("storage", "news_path", "daily_news_data.csv");
    let counts = config.get_string_or("storage", "counts_path", "daily_sentiment_counts.csv");
    let checkpoint = config.get_string_or("storage", "checkpoint_path", "last_processed.txt");
    if news == counts || news == checkpoint || counts == checkpoint {
        return Err(invalid(
            "storage",
            "news_path",
            "news, counts and checkpoint paths must be distinct",
        ));
    }
    Ok(())
}

fn validate_feed(config: &dyn ConfigPort) -> Result<(), PulseError> {
    if let Some(template) = config.get_string("feed", "url_template") {
        if !template.contains("{ticker}") {
            return Err(invalid("feed", "url_template", "must contain {ticker}"));
        }
    }
    if config.get_int("feed", "timeout_secs", 15)? <= 0 {
        return Err(invalid("feed", "timeout_secs", "timeout_secs must be positive"));
    }
    Ok(())
}

fn validate_classifier(config: &dyn ConfigPort) -> Result<(), PulseError> {
    if config.get_int("classifier", "max_chars", 512)? <= 0 {
        return Err(invalid("classifier", "max_chars", "max_chars must be positive"));
    }

    let threshold = config.get_double("classifier", "threshold", 0.2)?;
    if !(0.0..1.0).contains(&threshold) {
        return Err(invalid("classifier", "threshold", "threshold must be in [0, 1)"));
    }

    match config.get_string_or("classifier", "kind", "lexicon").to_lowercase().as_str() {
        "lexicon" => Ok(()),
        "http" => match config.get_string("classifier", "endpoint") {
            Some(url) if !url.trim().is_empty() => Ok(()),
            _ => Err(PulseError::ConfigMissing {
                section: "classifier".to_string(),
                key: "endpoint".to_string(),
            }),
        },
        other => Err(invalid(
            "classifier",
            "kind",
            format!("expected 'lexicon' or 'http', got '{other}'"),
        )),
    }
}
