#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::America::New_York;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tickerpulse::domain::article::{Article, RawArticle, SentimentCount};
use tickerpulse::domain::error::{ClassifierError, FeedError, PulseError};
use tickerpulse::domain::ingest::IngestPorts;
use tickerpulse::domain::sentiment::Sentiment;
use tickerpulse::ports::checkpoint_port::{first_run_cutoff, CheckpointPort};
use tickerpulse::ports::classifier_port::ClassifierPort;
use tickerpulse::ports::news_port::NewsPort;
use tickerpulse::ports::store_port::{ArticleStore, CountStore};

pub struct MockNewsPort {
    pub data: RefCell<HashMap<String, Vec<RawArticle>>>,
    pub errors: HashMap<String, String>,
}

impl MockNewsPort {
    pub fn new() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            errors: HashMap::new(),
        }
    }

    pub fn with_articles(self, ticker: &str, articles: Vec<RawArticle>) -> Self {
        self.data.borrow_mut().insert(ticker.to_string(), articles);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn push(&self, ticker: &str, article: RawArticle) {
        self.data
            .borrow_mut()
            .entry(ticker.to_string())
            .or_default()
            .push(article);
    }
}

impl NewsPort for MockNewsPort {
    fn fetch(&self, ticker: &str) -> Result<Vec<RawArticle>, FeedError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(FeedError::Malformed(reason.clone()));
        }
        Ok(self.data.borrow().get(ticker).cloned().unwrap_or_default())
    }
}

/// Labels by keyword and records every text it is asked about.
pub struct MockClassifier {
    pub calls: RefCell<Vec<String>>,
    pub failures: Cell<usize>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failures: Cell::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ClassifierPort for MockClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        self.calls.borrow_mut().push(text.to_string());
        if text.contains("FAIL") {
            self.failures.set(self.failures.get() + 1);
            return Err(ClassifierError::Status {
                status: 503,
                body: "model loading".into(),
            });
        }
        Ok(if text.contains("good") {
            Sentiment::Positive
        } else if text.contains("bad") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        })
    }
}

#[derive(Default)]
pub struct MemArticleStore {
    pub rows: RefCell<Vec<Article>>,
    pub saves: Cell<usize>,
}

impl ArticleStore for MemArticleStore {
    fn load(&self) -> Result<Vec<Article>, PulseError> {
        Ok(self.rows.borrow().clone())
    }

    fn save(&self, articles: &[Article]) -> Result<(), PulseError> {
        self.saves.set(self.saves.get() + 1);
        *self.rows.borrow_mut() = articles.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemCountStore {
    pub rows: RefCell<Vec<SentimentCount>>,
}

impl CountStore for MemCountStore {
    fn load(&self) -> Result<Vec<SentimentCount>, PulseError> {
        Ok(self.rows.borrow().clone())
    }

    fn save(&self, counts: &[SentimentCount]) -> Result<(), PulseError> {
        *self.rows.borrow_mut() = counts.to_vec();
        Ok(())
    }
}

/// A counts store whose writes always fail.
pub struct BrokenCountStore;

impl CountStore for BrokenCountStore {
    fn load(&self) -> Result<Vec<SentimentCount>, PulseError> {
        Ok(Vec::new())
    }

    fn save(&self, _counts: &[SentimentCount]) -> Result<(), PulseError> {
        Err(PulseError::storage("counts.csv", "disk full"))
    }
}

#[derive(Default)]
pub struct MemCheckpoint {
    pub value: RefCell<Option<DateTime<Utc>>>,
}

impl MemCheckpoint {
    pub fn at(ts: DateTime<Utc>) -> Self {
        Self {
            value: RefCell::new(Some(ts)),
        }
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        *self.value.borrow()
    }
}

impl CheckpointPort for MemCheckpoint {
    fn load(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.value.borrow().unwrap_or_else(|| first_run_cutoff(now))
    }

    fn save(&self, timestamp: DateTime<Utc>) -> Result<(), PulseError> {
        *self.value.borrow_mut() = Some(timestamp);
        Ok(())
    }
}

/// In-memory stand-ins for every port a run touches.
pub struct Harness {
    pub news: MockNewsPort,
    pub classifier: MockClassifier,
    pub articles: MemArticleStore,
    pub counts: MemCountStore,
    pub checkpoint: MemCheckpoint,
}

impl Harness {
    pub fn new(news: MockNewsPort) -> Self {
        Self {
            news,
            classifier: MockClassifier::new(),
            articles: MemArticleStore::default(),
            counts: MemCountStore::default(),
            checkpoint: MemCheckpoint::default(),
        }
    }

    pub fn ports(&self) -> IngestPorts<'_> {
        IngestPorts {
            news: &self.news,
            classifier: &self.classifier,
            articles: &self.articles,
            counts: &self.counts,
            checkpoint: &self.checkpoint,
        }
    }
}

/// Fixed wall clock used by every scenario: 2024-03-15 20:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap()
}

pub fn raw_at(ts: DateTime<Utc>, title: &str, summary: &str) -> RawArticle {
    RawArticle {
        published_at: ts.with_timezone(&New_York),
        title: Some(title.to_string()),
        summary: summary.to_string(),
    }
}

pub fn raw_hours_ago(hours: i64, title: &str, summary: &str) -> RawArticle {
    raw_at(now() - Duration::hours(hours), title, summary)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every count row sums to the number of stored articles sharing its key,
/// and every (date, ticker) in the store has a row.
pub fn assert_counts_match_articles(articles: &[Article], counts: &[SentimentCount]) {
    let mut expected: HashMap<(NaiveDate, String), u32> = HashMap::new();
    for a in articles {
        *expected.entry((a.date, a.ticker.clone())).or_default() += 1;
    }
    for row in counts {
        let key = (row.date, row.ticker.clone());
        assert_eq!(
            Some(&row.total()),
            expected.get(&key),
            "count row {key:?} does not match its articles"
        );
    }
    assert_eq!(expected.len(), counts.len(), "missing or extra day-records");
}
