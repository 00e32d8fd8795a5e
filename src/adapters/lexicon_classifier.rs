//! Offline financial-lexicon classifier.
//!
//! Word scores are averaged over matched terms; a negation within the
//! preceding three tokens flips a term's sign. Deterministic, no model files.

use crate::domain::error::ClassifierError;
use crate::domain::sentiment::Sentiment;
use crate::ports::classifier_port::ClassifierPort;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_THRESHOLD: f64 = 0.2;

const NEGATION_WINDOW: usize = 3;

const POSITIVE: &[(&str, f64)] = &[
    ("beat", 0.6),
    ("beats", 0.6),
    ("bullish", 0.8),
    ("gain", 0.5),
    ("gains", 0.5),
    ("growth", 0.6),
    ("grow", 0.5),
    ("grows", 0.5),
    ("improve", 0.5),
    ("improved", 0.5),
    ("jump", 0.6),
    ("jumps", 0.6),
    ("outperform", 0.7),
    ("profit", 0.6),
    ("profits", 0.6),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("rebound", 0.5),
    ("record", 0.5),
    ("recovery", 0.5),
    ("rise", 0.5),
    ("rises", 0.5),
    ("rose", 0.5),
    ("soar", 0.8),
    ("soars", 0.8),
    ("strong", 0.5),
    ("surge", 0.7),
    ("surges", 0.7),
    ("upgrade", 0.6),
    ("upgraded", 0.6),
    ("exceed", 0.6),
    ("exceeds", 0.6),
    ("raises", 0.4),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("cut", -0.4),
    ("cuts", -0.4),
    ("decline", -0.6),
    ("declines", -0.6),
    ("disappoint", -0.7),
    ("disappointing", -0.7),
    ("downgrade", -0.6),
    ("downgraded", -0.6),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("fell", -0.5),
    ("fraud", -0.9),
    ("lawsuit", -0.6),
    ("layoffs", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("miss", -0.6),
    ("misses", -0.6),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("probe", -0.5),
    ("recall", -0.5),
    ("slump", -0.7),
    ("slumps", -0.7),
    ("slip", -0.4),
    ("slips", -0.4),
    ("tumble", -0.7),
    ("tumbles", -0.7),
    ("warning", -0.5),
    ("weak", -0.5),
    ("worries", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "isn't", "wasn't", "don't", "doesn't", "didn't", "won't",
    "can't", "cannot", "hardly",
];

pub struct LexiconClassifier {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    threshold: f64,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LexiconClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            words: POSITIVE.iter().chain(NEGATIVE).copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            threshold,
        }
    }

    /// Mean score of matched terms, in [-1, 1]; 0 when nothing matches.
    pub fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut total = 0.0;
        let mut hits = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&weight) = self.words.get(token) else {
                continue;
            };
            let start = i.saturating_sub(NEGATION_WINDOW);
            let negated = tokens[start..i].iter().any(|t| self.negations.contains(t));
            total += if negated { -weight } else { weight };
            hits += 1;
        }

        if hits == 0 { 0.0 } else { total / hits as f64 }
    }
}

impl ClassifierPort for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let score = self.score(text);
        Ok(if score > self.threshold {
            Sentiment::Positive
        } else if score < -self.threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        })
    }
}
