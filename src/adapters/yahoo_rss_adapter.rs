//! Yahoo Finance headline RSS feed.
//!
//! One GET per ticker; items are decoded with quick-xml and their RFC 2822
//! `pubDate` converted into the tracking timezone before leaving the adapter.

use crate::domain::article::RawArticle;
use crate::domain::error::FeedError;
use crate::ports::news_port::NewsPort;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://feeds.finance.yahoo.com/rss/2.0/headline?s={ticker}&region=US&lang=en-US";

const USER_AGENT: &str = concat!("tickerpulse/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct Rss {
    channel: Option<Channel>,
}

#[derive(Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Decode an RSS 2.0 document into articles stamped in `tz`.
///
/// Items without a parseable `pubDate` or a non-empty description are
/// skipped; a document that is not RSS at all is an error.
pub fn parse_feed(body: &str, tz: Tz) -> Result<Vec<RawArticle>, FeedError> {
    let rss: Rss = quick_xml::de::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;
    let Some(channel) = rss.channel else {
        return Err(FeedError::Malformed("missing <channel>".into()));
    };

    let articles = channel
        .items
        .into_iter()
        .filter_map(|item| {
            let Some(published) = item
                .pub_date
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
            else {
                debug!(title = ?item.title, "dropping item without usable pubDate");
                return None;
            };
            let summary = item
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
            let Some(summary) = summary else {
                debug!(title = ?item.title, "dropping item without description");
                return None;
            };
            Some(RawArticle {
                published_at: published.with_timezone(&tz),
                title: item
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
                summary,
            })
        })
        .collect();

    Ok(articles)
}

pub struct YahooRssAdapter {
    client: reqwest::blocking::Client,
    url_template: String,
    tz: Tz,
}

impl YahooRssAdapter {
    pub fn new(url_template: String, tz: Tz, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url_template,
            tz,
        })
    }

    pub fn url_for(&self, ticker: &str) -> String {
        self.url_template.replace("{ticker}", ticker)
    }
}

impl NewsPort for YahooRssAdapter {
    fn fetch(&self, ticker: &str) -> Result<Vec<RawArticle>, FeedError> {
        let url = self.url_for(ticker);
        debug!(ticker, url = %url, "fetching feed");

        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text()?;
        parse_feed(&body, self.tz)
    }
}
