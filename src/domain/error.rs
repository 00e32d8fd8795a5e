//! Domain error types.

/// Top-level error type for tickerpulse.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error("failed to initialise {component}: {reason}")]
    Init { component: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PulseError {
    pub fn storage(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        PulseError::Storage {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure while retrieving or decoding a ticker's news feed.
///
/// Never fatal to a run: the orchestrator logs it and moves to the next ticker.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed feed: {0}")]
    Malformed(String),
}

/// Failure while classifying a single article.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unrecognised sentiment label: {0}")]
    UnknownLabel(String),

    #[error("classifier returned no labels")]
    Empty,

    #[error("invalid classifier response: {0}")]
    Response(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TickerError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    Duplicate(String),
}

impl From<&PulseError> for std::process::ExitCode {
    fn from(err: &PulseError) -> Self {
        let code: u8 = match err {
            PulseError::Io(_) | PulseError::Init { .. } => 1,
            PulseError::ConfigParse { .. }
            | PulseError::ConfigMissing { .. }
            | PulseError::ConfigInvalid { .. }
            | PulseError::Ticker(_) => 2,
            PulseError::Storage { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
