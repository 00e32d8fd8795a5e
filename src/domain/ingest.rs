//! Incremental ingestion run.
//!
//! One run: load the checkpoint, fetch each ticker, keep what is new,
//! classify it, merge it into the news store, rebuild the count rows of
//! every touched day from the merged articles, then advance the checkpoint.
//! Per-ticker fetch failures and per-article classifier failures are logged
//! and absorbed; storage failures abort the run. Nothing is retried.

use crate::domain::aggregate::{aggregate_counts, select_new, touched_days, IngestPolicy};
use crate::domain::article::{Article, ArticleKey, DedupKey};
use crate::domain::error::PulseError;
use crate::domain::merge::key_set;
use crate::domain::sentiment::DEFAULT_MAX_CHARS;
use crate::ports::checkpoint_port::CheckpointPort;
use crate::ports::classifier_port::ClassifierPort;
use crate::ports::news_port::NewsPort;
use crate::ports::store_port::{ArticleStore, CountStore};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub tickers: Vec<String>,
    pub policy: IngestPolicy,
    pub dedup_key: DedupKey,
    pub max_chars: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            tickers: crate::domain::tickers::default_tickers(),
            policy: IngestPolicy::default(),
            dedup_key: DedupKey::default(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// The collaborators a run talks to.
pub struct IngestPorts<'a> {
    pub news: &'a dyn NewsPort,
    pub classifier: &'a dyn ClassifierPort,
    pub articles: &'a dyn ArticleStore,
    pub counts: &'a dyn CountStore,
    pub checkpoint: &'a dyn CheckpointPort,
}

/// Articles accepted from one pass over the tickers, plus its bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct Batch {
    pub articles: Vec<Article>,
    /// Newest publication instant among accepted articles.
    pub newest: Option<DateTime<Utc>>,
    pub fetched: usize,
    pub stale: usize,
    pub duplicates: usize,
    pub unclassified: usize,
    pub failed_tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    pub policy: IngestPolicy,
    pub cutoff: DateTime<Utc>,
    pub checkpoint: DateTime<Utc>,
    pub tickers_requested: usize,
    pub tickers_failed: Vec<String>,
    pub articles_fetched: usize,
    pub articles_ingested: usize,
    pub articles_stale: usize,
    pub articles_duplicate: usize,
    pub articles_unclassified: usize,
    /// Previously stored rows labelled during this run.
    pub stored_labelled: usize,
    /// Previously stored rows removed because they could not be labelled.
    pub stored_dropped: usize,
    pub days_touched: usize,
    pub day_records_recomputed: usize,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ingested {} new articles from {} tickers ({} failed); recomputed {} day-records",
            self.articles_ingested,
            self.tickers_requested,
            self.tickers_failed.len(),
            self.day_records_recomputed
        )
    }
}

/// Fetch, filter, dedup and classify every configured ticker.
///
/// `known` holds the keys already in the news store; articles matching one
/// are not classified again.
pub fn collect_batch(
    news: &dyn NewsPort,
    classifier: &dyn ClassifierPort,
    options: &IngestOptions,
    cutoff: DateTime<Utc>,
    mut known: BTreeSet<ArticleKey>,
) -> Batch {
    let mut batch = Batch::default();

    for ticker in &options.tickers {
        let candidates = match news.fetch(ticker) {
            Ok(items) => items,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "news fetch failed, skipping ticker");
                batch.failed_tickers.push(ticker.clone());
                continue;
            }
        };
        if candidates.is_empty() {
            debug!(ticker = %ticker, "no news returned");
            continue;
        }

        let fetched = candidates.len();
        batch.fetched += fetched;
        let fresh = select_new(candidates, cutoff, options.policy);
        batch.stale += fetched - fresh.len();

        let mut accepted = 0usize;
        for raw in fresh {
            let published = raw.published_utc();
            let text = raw.classifier_text().to_string();
            let mut article = raw.into_article(ticker, None);

            if !known.insert(options.dedup_key.key_for(&article)) {
                batch.duplicates += 1;
                continue;
            }

            match classifier.classify_truncated(&text, options.max_chars) {
                Ok(sentiment) => article.sentiment = Some(sentiment),
                Err(e) => {
                    warn!(
                        ticker = %ticker,
                        title = article.title.as_deref().unwrap_or(""),
                        error = %e,
                        "classification failed, skipping article"
                    );
                    batch.unclassified += 1;
                    continue;
                }
            }

            batch.newest = batch.newest.max(Some(published));
            batch.articles.push(article);
            accepted += 1;
        }

        info!(ticker = %ticker, fetched, accepted, "processed ticker");
    }

    batch
}

/// Result of labelling stored rows that lack a sentiment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Relabel {
    pub labelled: usize,
    /// Rows the classifier rejected; they are removed from the store.
    pub dropped: usize,
}

impl Relabel {
    pub fn changed(&self) -> bool {
        self.labelled + self.dropped > 0
    }
}

/// Label any article in `days` that has no stored sentiment.
///
/// Only rows written by older versions of the store lack a label. A row the
/// classifier cannot label is removed, so every stored row stays counted.
pub fn label_missing(
    articles: &mut Vec<Article>,
    days: Option<&BTreeSet<NaiveDate>>,
    classifier: &dyn ClassifierPort,
    max_chars: usize,
) -> Relabel {
    let mut outcome = Relabel::default();
    articles.retain_mut(|article| {
        if article.sentiment.is_some() || days.is_some_and(|d| !d.contains(&article.date)) {
            return true;
        }
        match classifier.classify_truncated(article.classifier_text(), max_chars) {
            Ok(sentiment) => {
                article.sentiment = Some(sentiment);
                outcome.labelled += 1;
                true
            }
            Err(e) => {
                warn!(
                    ticker = %article.ticker,
                    date = %article.date,
                    title = article.title.as_deref().unwrap_or(""),
                    error = %e,
                    "could not label stored article, removing it from the news store"
                );
                outcome.dropped += 1;
                false
            }
        }
    });
    outcome
}

pub fn run_ingest(
    ports: &IngestPorts<'_>,
    options: &IngestOptions,
    now: DateTime<Utc>,
) -> Result<IngestSummary, PulseError> {
    let cutoff = ports.checkpoint.load(now);
    info!(
        cutoff = %cutoff,
        policy = %options.policy,
        tickers = options.tickers.len(),
        "starting ingest run"
    );

    let known = key_set(&ports.articles.load()?, options.dedup_key);

    let batch = collect_batch(ports.news, ports.classifier, options, cutoff, known);
    let ingested = batch.articles.len();

    let mut days = touched_days(&batch.articles);
    let mut merged = if ingested > 0 || options.policy == IngestPolicy::FullResync {
        ports.articles.merge_articles(batch.articles, options.dedup_key)?
    } else {
        Vec::new()
    };

    if options.policy == IngestPolicy::FullResync {
        days = touched_days(&merged);
    }

    let mut recomputed = 0;
    let mut relabel = Relabel::default();
    if !days.is_empty() {
        relabel = label_missing(&mut merged, Some(&days), ports.classifier, options.max_chars);
        if relabel.changed() {
            ports.articles.save(&merged)?;
        }
        let fresh = aggregate_counts(merged.iter().filter(|a| days.contains(&a.date)));
        recomputed = fresh.len();
        ports.counts.replace_counts_for_days(&days, fresh)?;
    }

    let checkpoint = batch.newest.map_or(cutoff, |newest| newest.max(cutoff));
    ports.checkpoint.save(checkpoint)?;

    let summary = IngestSummary {
        policy: options.policy,
        cutoff,
        checkpoint,
        tickers_requested: options.tickers.len(),
        tickers_failed: batch.failed_tickers,
        articles_fetched: batch.fetched,
        articles_ingested: ingested,
        articles_stale: batch.stale,
        articles_duplicate: batch.duplicates,
        articles_unclassified: batch.unclassified,
        stored_labelled: relabel.labelled,
        stored_dropped: relabel.dropped,
        days_touched: days.len(),
        day_records_recomputed: recomputed,
    };
    info!(
        ingested = summary.articles_ingested,
        stale = summary.articles_stale,
        duplicate = summary.articles_duplicate,
        unclassified = summary.articles_unclassified,
        dropped = summary.stored_dropped,
        recomputed = summary.day_records_recomputed,
        checkpoint = %summary.checkpoint,
        "ingest run complete"
    );
    Ok(summary)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecountSummary {
    pub articles: usize,
    pub labelled: usize,
    pub dropped: usize,
    pub day_records: usize,
}

/// Rebuild the whole counts store from the news store.
pub fn recount_all(
    articles: &dyn ArticleStore,
    counts: &dyn CountStore,
    classifier: &dyn ClassifierPort,
    max_chars: usize,
) -> Result<RecountSummary, PulseError> {
    let mut stored = articles.load()?;
    let relabel = label_missing(&mut stored, None, classifier, max_chars);
    if relabel.changed() {
        articles.save(&stored)?;
    }
    let rows = aggregate_counts(&stored);
    counts.save(&rows)?;
    info!(
        articles = stored.len(),
        labelled = relabel.labelled,
        dropped = relabel.dropped,
        day_records = rows.len(),
        "recount complete"
    );
    Ok(RecountSummary {
        articles: stored.len(),
        labelled: relabel.labelled,
        dropped: relabel.dropped,
        day_records: rows.len(),
    })
}
