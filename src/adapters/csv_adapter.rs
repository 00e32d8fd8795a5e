//! CSV file stores for news articles and daily sentiment counts.
//!
//! Every save rewrites the whole file through a sibling temp file and a
//! rename, so an interrupted write leaves the previous contents in place.

use crate::domain::article::{Article, SentimentCount};
use crate::domain::error::PulseError;
use crate::ports::store_port::{ArticleStore, CountStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const NEWS_HEADERS: [&str; 5] = ["date", "ticker", "title", "summary", "sentiment"];
pub const COUNT_HEADERS: [&str; 5] = ["date", "ticker", "positive", "negative", "neutral"];

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PulseError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(path).map_err(|e| PulseError::storage(path.display(), e))?;
    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: T = result.map_err(|e| {
            PulseError::storage(path.display(), format!("row {}: {}", line + 1, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<(), PulseError> {
    let tmp = temp_path(path);
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp)
            .map_err(|e| PulseError::storage(tmp.display(), e))?;
        wtr.write_record(headers)
            .map_err(|e| PulseError::storage(tmp.display(), e))?;
        for row in rows {
            wtr.serialize(row)
                .map_err(|e| PulseError::storage(tmp.display(), e))?;
        }
        wtr.flush()
            .map_err(|e| PulseError::storage(tmp.display(), e))?;
    }
    fs::rename(&tmp, path).map_err(|e| PulseError::storage(path.display(), e))
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

pub struct CsvArticleStore {
    path: PathBuf,
}

impl CsvArticleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArticleStore for CsvArticleStore {
    fn load(&self) -> Result<Vec<Article>, PulseError> {
        read_rows(&self.path)
    }

    fn save(&self, articles: &[Article]) -> Result<(), PulseError> {
        write_rows(&self.path, &NEWS_HEADERS, articles)
    }
}

pub struct CsvCountStore {
    path: PathBuf,
}

impl CsvCountStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CountStore for CsvCountStore {
    fn load(&self) -> Result<Vec<SentimentCount>, PulseError> {
        read_rows(&self.path)
    }

    fn save(&self, counts: &[SentimentCount]) -> Result<(), PulseError> {
        write_rows(&self.path, &COUNT_HEADERS, counts)
    }
}
