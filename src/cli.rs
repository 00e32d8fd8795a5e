//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

use crate::adapters::checkpoint_file_adapter::FileCheckpointAdapter;
use crate::adapters::csv_adapter::{CsvArticleStore, CsvCountStore};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_classifier_adapter::HttpClassifierAdapter;
use crate::adapters::lexicon_classifier::LexiconClassifier;
use crate::adapters::yahoo_rss_adapter::{YahooRssAdapter, DEFAULT_URL_TEMPLATE};
use crate::domain::aggregate::IngestPolicy;
use crate::domain::article::DedupKey;
use crate::domain::config_validation::validate_config;
use crate::domain::error::PulseError;
use crate::domain::ingest::{recount_all, run_ingest, IngestOptions, IngestPorts, IngestSummary, RecountSummary};
use crate::domain::sentiment::DEFAULT_MAX_CHARS;
use crate::domain::tickers::{default_tickers, parse_tickers};
use crate::ports::checkpoint_port::CheckpointPort;
use crate::ports::classifier_port::ClassifierPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::news_port::NewsPort;

#[derive(Parser, Debug)]
#[command(name = "tickerpulse", about = "Incremental news sentiment counts per ticker")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, classify and store news published since the last run
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated tickers, overriding [ingest] tickers
        #[arg(long)]
        tickers: Option<String>,
        /// cursor or resync, overriding [ingest] policy
        #[arg(long)]
        policy: Option<String>,
    },
    /// Check a configuration file without touching any store
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Rebuild the whole counts store from the news store
    Recount {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show or overwrite the stored checkpoint
    Checkpoint {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// RFC 3339 timestamp to store as the new checkpoint
        #[arg(long)]
        set: Option<String>,
    },
}

/// Classifier backend selected in `[classifier] kind`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierSettings {
    Lexicon { threshold: f64 },
    Http { endpoint: String, token: Option<String> },
}

/// Everything a run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub options: IngestOptions,
    pub timezone: Tz,
    pub news_path: PathBuf,
    pub counts_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub url_template: String,
    pub timeout: Duration,
    pub classifier: ClassifierSettings,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            tickers,
            policy,
        } => run_ingest_command(config.as_deref(), tickers.as_deref(), policy.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Recount { config } => run_recount(config.as_deref()),
        Command::Checkpoint { config, set } => run_checkpoint(config.as_deref(), set.as_deref()),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, PulseError> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p).map_err(|e| PulseError::ConfigParse {
                file: p.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn parse_setting<T: std::str::FromStr<Err = String>>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: &str,
) -> Result<T, PulseError> {
    config
        .get_string_or(section, key, default)
        .parse()
        .map_err(|reason| PulseError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        })
}

pub fn build_settings(
    config: &dyn ConfigPort,
    tickers_override: Option<&str>,
    policy_override: Option<&str>,
) -> Result<Settings, PulseError> {
    validate_config(config)?;

    let tickers = match tickers_override {
        Some(list) => parse_tickers(list)?,
        None => match config
            .get_string("ingest", "tickers")
            .filter(|s| !s.trim().is_empty())
        {
            Some(list) => parse_tickers(&list)?,
            None => default_tickers(),
        },
    };

    let policy: IngestPolicy = match policy_override {
        Some(p) => p.parse().map_err(|reason| PulseError::ConfigInvalid {
            section: "ingest".into(),
            key: "policy".into(),
            reason,
        })?,
        None => parse_setting(config, "ingest", "policy", "cursor")?,
    };
    let dedup_key: DedupKey = parse_setting(config, "ingest", "dedup_key", "title")?;

    let tz_name = config.get_string_or("ingest", "timezone", "America/New_York");
    let timezone: Tz = tz_name.parse().map_err(|_| PulseError::ConfigInvalid {
        section: "ingest".into(),
        key: "timezone".into(),
        reason: format!("unknown IANA timezone '{tz_name}'"),
    })?;

    let classifier = match config
        .get_string_or("classifier", "kind", "lexicon")
        .to_lowercase()
        .as_str()
    {
        "http" => ClassifierSettings::Http {
            endpoint: config.get_string_or("classifier", "endpoint", ""),
            token: config
                .get_string("classifier", "token")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        },
        _ => ClassifierSettings::Lexicon {
            threshold: config.get_double("classifier", "threshold", 0.2)?,
        },
    };

    Ok(Settings {
        options: IngestOptions {
            tickers,
            policy,
            dedup_key,
            max_chars: config.get_int("classifier", "max_chars", DEFAULT_MAX_CHARS as i64)? as usize,
        },
        timezone,
        news_path: config
            .get_string_or("storage", "news_path", "daily_news_data.csv")
            .into(),
        counts_path: config
            .get_string_or("storage", "counts_path", "daily_sentiment_counts.csv")
            .into(),
        checkpoint_path: config
            .get_string_or("storage", "checkpoint_path", "last_processed.txt")
            .into(),
        url_template: config.get_string_or("feed", "url_template", DEFAULT_URL_TEMPLATE),
        timeout: Duration::from_secs(config.get_int("feed", "timeout_secs", 15)? as u64),
        classifier,
    })
}

pub fn build_classifier(settings: &Settings) -> Result<Box<dyn ClassifierPort>, PulseError> {
    match &settings.classifier {
        ClassifierSettings::Lexicon { threshold } => Ok(Box::new(LexiconClassifier::new(*threshold))),
        ClassifierSettings::Http { endpoint, token } => {
            let adapter = HttpClassifierAdapter::new(endpoint.clone(), token.clone(), settings.timeout)
                .map_err(|e| PulseError::Init {
                    component: "classifier".into(),
                    reason: e.to_string(),
                })?;
            Ok(Box::new(adapter))
        }
    }
}

pub fn build_news(settings: &Settings) -> Result<YahooRssAdapter, PulseError> {
    YahooRssAdapter::new(settings.url_template.clone(), settings.timezone, settings.timeout).map_err(
        |e| PulseError::Init {
            component: "news feed".into(),
            reason: e.to_string(),
        },
    )
}

/// One ingest run against the CSV stores and checkpoint named in `settings`.
pub fn run_pipeline(
    settings: &Settings,
    news: &dyn NewsPort,
    classifier: &dyn ClassifierPort,
    now: DateTime<Utc>,
) -> Result<IngestSummary, PulseError> {
    let articles = CsvArticleStore::new(settings.news_path.clone());
    let counts = CsvCountStore::new(settings.counts_path.clone());
    let checkpoint = FileCheckpointAdapter::new(settings.checkpoint_path.clone());
    let ports = IngestPorts {
        news,
        classifier,
        articles: &articles,
        counts: &counts,
        checkpoint: &checkpoint,
    };
    run_ingest(&ports, &settings.options, now)
}

pub fn recount_pipeline(
    settings: &Settings,
    classifier: &dyn ClassifierPort,
) -> Result<RecountSummary, PulseError> {
    recount_all(
        &CsvArticleStore::new(settings.news_path.clone()),
        &CsvCountStore::new(settings.counts_path.clone()),
        classifier,
        settings.options.max_chars,
    )
}

fn fail(err: PulseError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn run_ingest_command(
    config_path: Option<&Path>,
    tickers: Option<&str>,
    policy: Option<&str>,
) -> ExitCode {
    let result = load_config(config_path)
        .and_then(|config| build_settings(&config, tickers, policy))
        .and_then(|settings| {
            let news = build_news(&settings)?;
            let classifier = build_classifier(&settings)?;
            run_pipeline(&settings, &news, classifier.as_ref(), Utc::now())
        });

    match result {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let result = load_config(Some(config_path)).and_then(|config| build_settings(&config, None, None));
    match result {
        Ok(settings) => {
            println!(
                "Configuration is valid: {} tickers, {} policy, timezone {}",
                settings.options.tickers.len(),
                settings.options.policy,
                settings.timezone
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_recount(config_path: Option<&Path>) -> ExitCode {
    let result = load_config(config_path)
        .and_then(|config| build_settings(&config, None, None))
        .and_then(|settings| {
            let classifier = build_classifier(&settings)?;
            recount_pipeline(&settings, classifier.as_ref())
        });
    match result {
        Ok(summary) => {
            println!(
                "Recounted {} articles ({} newly labelled, {} unlabelable removed) into {} day-records",
                summary.articles, summary.labelled, summary.dropped, summary.day_records
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_checkpoint(config_path: Option<&Path>, set: Option<&str>) -> ExitCode {
    let settings = match load_config(config_path).and_then(|c| build_settings(&c, None, None)) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let adapter = FileCheckpointAdapter::new(settings.checkpoint_path.clone());

    if let Some(value) = set {
        let ts = match DateTime::parse_from_rfc3339(value.trim()) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                eprintln!("error: invalid timestamp '{value}': {e}");
                return ExitCode::from(2);
            }
        };
        if let Err(e) = adapter.save(ts) {
            return fail(e);
        }
        println!("Checkpoint set to {}", ts.to_rfc3339());
        return ExitCode::SUCCESS;
    }

    match adapter.read() {
        Ok(Some(ts)) => println!("{}", ts.to_rfc3339()),
        Ok(None) => println!(
            "No checkpoint at {}; next run starts from {}",
            adapter.path().display(),
            adapter.load(Utc::now()).to_rfc3339()
        ),
        Err(reason) => println!(
            "Unreadable checkpoint at {} ({reason}); next run starts from {}",
            adapter.path().display(),
            adapter.load(Utc::now()).to_rfc3339()
        ),
    }
    ExitCode::SUCCESS
}
