//! Merge and replacement algorithms behind the persistence ports.
//!
//! Kept free of I/O so the dedup rules can be tested directly; the store
//! traits in [`crate::ports::store_port`] wrap them in load/save.

use crate::domain::article::{Article, ArticleKey, DedupKey, SentimentCount};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Concatenate `existing` and `batch`, dropping duplicate keys.
///
/// On conflict the last-seen copy wins but keeps the slot of the first
/// occurrence. Output is stably ordered by (date, ticker).
pub fn merge_articles(existing: Vec<Article>, batch: Vec<Article>, key: DedupKey) -> Vec<Article> {
    let mut slots: HashMap<ArticleKey, usize> = HashMap::new();
    let mut merged: Vec<Article> = Vec::with_capacity(existing.len() + batch.len());

    for article in existing.into_iter().chain(batch) {
        let k = key.key_for(&article);
        match slots.get(&k) {
            Some(&idx) => merged[idx] = article,
            None => {
                slots.insert(k, merged.len());
                merged.push(article);
            }
        }
    }

    merged.sort_by(|a, b| (a.date, &a.ticker).cmp(&(b.date, &b.ticker)));
    merged
}

/// Drop every row dated in `days`, then append `fresh`.
pub fn replace_counts_for_days(
    existing: Vec<SentimentCount>,
    days: &BTreeSet<NaiveDate>,
    fresh: Vec<SentimentCount>,
) -> Vec<SentimentCount> {
    let mut rows: Vec<SentimentCount> = existing
        .into_iter()
        .filter(|row| !days.contains(&row.date))
        .chain(fresh)
        .collect();
    rows.sort_by(|a, b| (a.date, &a.ticker).cmp(&(b.date, &b.ticker)));
    rows
}

/// Keys already present in a store, for filtering a batch before it is
/// classified.
pub fn key_set(articles: &[Article], key: DedupKey) -> BTreeSet<ArticleKey> {
    articles.iter().map(|a| key.key_for(a)).collect()
}
