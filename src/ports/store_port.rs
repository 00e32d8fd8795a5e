//! Persistence ports for the news and counts stores.
//!
//! Implementors supply whole-store `load`/`save`; the merge operations are
//! provided on top of the pure algorithms in [`crate::domain::merge`].
//! Read-modify-write assumes a single writer.

use crate::domain::article::{Article, DedupKey, SentimentCount};
use crate::domain::error::PulseError;
use crate::domain::merge;
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub trait ArticleStore {
    /// All stored articles; an absent store is empty.
    fn load(&self) -> Result<Vec<Article>, PulseError>;

    /// Replace the store's full contents.
    fn save(&self, articles: &[Article]) -> Result<(), PulseError>;

    /// Load, append `batch`, dedup on `key` keeping the last copy, write back.
    /// Returns the merged contents.
    fn merge_articles(&self, batch: Vec<Article>, key: DedupKey) -> Result<Vec<Article>, PulseError> {
        let existing = self.load()?;
        let merged = merge::merge_articles(existing, batch, key);
        self.save(&merged)?;
        Ok(merged)
    }
}

pub trait CountStore {
    fn load(&self) -> Result<Vec<SentimentCount>, PulseError>;

    fn save(&self, counts: &[SentimentCount]) -> Result<(), PulseError>;

    /// Load, drop rows dated in `days`, append `fresh`, write back.
    fn replace_counts_for_days(
        &self,
        days: &BTreeSet<NaiveDate>,
        fresh: Vec<SentimentCount>,
    ) -> Result<Vec<SentimentCount>, PulseError> {
        let existing = self.load()?;
        let rows = merge::replace_counts_for_days(existing, days, fresh);
        self.save(&rows)?;
        Ok(rows)
    }
}
