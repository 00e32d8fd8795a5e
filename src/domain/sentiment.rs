//! Sentiment labels and classifier input preparation.

use crate::domain::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input ceiling of the pretrained financial sentiment model, in characters.
pub const DEFAULT_MAX_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(ClassifierError::UnknownLabel(s.to_string())),
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
///
/// Cuts on a char boundary; input is never rejected for being long.
pub fn truncate_for_classifier(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_labels_case_insensitively() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("NEGATIVE".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!(" Neutral ".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "bullish".parse::<Sentiment>().unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownLabel(l) if l == "bullish"));
    }

    #[test]
    fn display_matches_as_str() {
        for s in Sentiment::ALL {
            assert_eq!(s.to_string(), s.as_str());
        }
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_for_classifier("shares rose", 512), "shares rose");
    }

    #[test]
    fn truncate_cuts_long_text_to_ceiling() {
        let text = "a".repeat(600);
        assert_eq!(truncate_for_classifier(&text, 512).len(), 512);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "€€€€";
        assert_eq!(truncate_for_classifier(text, 2), "€€");
    }

    #[test]
    fn truncate_exact_length_is_unchanged() {
        assert_eq!(truncate_for_classifier("abc", 3), "abc");
        assert_eq!(truncate_for_classifier("abc", 0), "");
    }
}
