//! Configuration access port trait.

use crate::domain::error::PulseError;
use std::fmt::Display;
use std::str::FromStr;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Trimmed value, or `default` when the key is missing or blank.
    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer value; `default` when missing or blank, an error when present
    /// but not a number.
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, PulseError> {
        parse_number(self.get_string(section, key), section, key, default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, PulseError> {
        parse_number(self.get_string(section, key), section, key, default)
    }
}

fn parse_number<T>(raw: Option<String>, section: &str, key: &str, default: T) -> Result<T, PulseError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e| PulseError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{value}' is not a number: {e}"),
        }),
    }
}
