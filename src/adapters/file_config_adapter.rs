//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// An empty configuration; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PulseError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[ingest]
tickers = AAPL, MSFT
timezone = America/New_York

[feed]
timeout_secs = 20

[classifier]
threshold = 0.35
"#;

    #[test]
    fn reads_string_values() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("ingest", "tickers"),
            Some("AAPL, MSFT".to_string())
        );
        assert_eq!(adapter.get_string("ingest", "missing"), None);
        assert_eq!(adapter.get_string("nowhere", "tickers"), None);
    }

    #[test]
    fn reads_numbers_with_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("feed", "timeout_secs", 15).unwrap(), 20);
        assert_eq!(adapter.get_int("feed", "missing", 15).unwrap(), 15);
        assert_eq!(adapter.get_double("classifier", "threshold", 0.2).unwrap(), 0.35);
        assert_eq!(adapter.get_double("classifier", "missing", 0.2).unwrap(), 0.2);
    }

    #[test]
    fn non_numeric_values_are_errors() {
        let adapter =
            FileConfigAdapter::from_string("[feed]\ntimeout_secs = soon\n[classifier]\nthreshold = high\n")
                .unwrap();
        let err = adapter.get_int("feed", "timeout_secs", 15).unwrap_err();
        assert!(matches!(err, PulseError::ConfigInvalid { key, .. } if key == "timeout_secs"));
        let err = adapter.get_double("classifier", "threshold", 0.2).unwrap_err();
        assert!(matches!(err, PulseError::ConfigInvalid { key, .. } if key == "threshold"));
    }

    #[test]
    fn blank_number_means_default() {
        let adapter = FileConfigAdapter::from_string("[classifier]\nmax_chars =\n").unwrap();
        assert_eq!(adapter.get_int("classifier", "max_chars", 512).unwrap(), 512);
    }

    #[test]
    fn string_or_trims_and_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[ingest]\npolicy =   resync  \ndedup_key =\n").unwrap();
        assert_eq!(adapter.get_string_or("ingest", "policy", "cursor"), "resync");
        assert_eq!(adapter.get_string_or("ingest", "dedup_key", "title"), "title");
        assert_eq!(adapter.get_string_or("ingest", "timezone", "UTC"), "UTC");
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("ingest", "tickers"), None);
        assert_eq!(adapter.get_int("classifier", "max_chars", 512).unwrap(), 512);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[storage]\nnews_path = /data/news.csv\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("storage", "news_path"),
            Some("/data/news.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/path/tickerpulse.ini").is_err());
    }
}
