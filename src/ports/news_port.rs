//! News source port trait.

use crate::domain::article::RawArticle;
use crate::domain::error::FeedError;

pub trait NewsPort {
    /// Fetch the articles currently published for `ticker`.
    ///
    /// Timestamps are already converted to the pipeline's tracking timezone.
    /// Items missing a timestamp or text are dropped individually; an `Err`
    /// means nothing usable came back for this ticker.
    fn fetch(&self, ticker: &str) -> Result<Vec<RawArticle>, FeedError>;
}
