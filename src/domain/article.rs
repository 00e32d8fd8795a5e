//! News article and daily sentiment count records.

use crate::domain::sentiment::Sentiment;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A feed item as delivered by a news adapter.
///
/// `published_at` is already expressed in the pipeline's tracking timezone,
/// so calendar-day bucketing downstream needs no further conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub published_at: DateTime<Tz>,
    pub title: Option<String>,
    pub summary: String,
}

impl RawArticle {
    pub fn published_utc(&self) -> DateTime<Utc> {
        self.published_at.with_timezone(&Utc)
    }

    /// Text handed to the classifier: the summary, or the title when the
    /// summary is blank.
    pub fn classifier_text(&self) -> &str {
        if self.summary.trim().is_empty() {
            self.title.as_deref().unwrap_or("")
        } else {
            &self.summary
        }
    }

    pub fn into_article(self, ticker: &str, sentiment: Option<Sentiment>) -> Article {
        Article {
            date: self.published_at.date_naive(),
            ticker: ticker.to_string(),
            title: self.title,
            summary: self.summary,
            sentiment,
        }
    }
}

/// One stored news row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub date: NaiveDate,
    pub ticker: String,
    #[serde(default)]
    pub title: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl Article {
    pub fn classifier_text(&self) -> &str {
        if self.summary.trim().is_empty() {
            self.title.as_deref().unwrap_or("")
        } else {
            &self.summary
        }
    }
}

/// Which text field participates in the article uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// (ticker, title, date); articles without a title fall back to summary.
    #[default]
    Title,
    /// (ticker, summary, date).
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleKey {
    pub ticker: String,
    pub date: NaiveDate,
    pub text: String,
}

impl DedupKey {
    pub fn key_for(&self, article: &Article) -> ArticleKey {
        let text = match self {
            DedupKey::Title => article
                .title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&article.summary),
            DedupKey::Summary => &article.summary,
        };
        ArticleKey {
            ticker: article.ticker.clone(),
            date: article.date,
            text: text.trim().to_string(),
        }
    }
}

impl FromStr for DedupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(DedupKey::Title),
            "summary" => Ok(DedupKey::Summary),
            other => Err(format!("expected 'title' or 'summary', got '{other}'")),
        }
    }
}

/// Aggregated labels for one (date, ticker) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub date: NaiveDate,
    pub ticker: String,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl SentimentCount {
    pub fn new(date: NaiveDate, ticker: impl Into<String>) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            positive: 0,
            negative: 0,
            neutral: 0,
        }
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }
}
