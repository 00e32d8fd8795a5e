//! Sentiment classifier port trait.

use crate::domain::error::ClassifierError;
use crate::domain::sentiment::{truncate_for_classifier, Sentiment};

/// A pure text → label function. Same text and model give the same label.
pub trait ClassifierPort {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;

    /// Classify at most `max_chars` leading characters of `text`.
    fn classify_truncated(&self, text: &str, max_chars: usize) -> Result<Sentiment, ClassifierError> {
        self.classify(truncate_for_classifier(text, max_chars))
    }
}
