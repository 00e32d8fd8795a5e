//! Remote text-classification endpoint (Hugging Face inference style).

use crate::domain::error::ClassifierError;
use crate::domain::sentiment::Sentiment;
use crate::ports::classifier_port::ClassifierPort;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Single-input replies come back either nested per input or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Pick the highest-scoring label from a raw endpoint reply.
pub fn parse_response(body: &str) -> Result<Sentiment, ClassifierError> {
    let parsed: InferenceResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Response(e.to_string()))?;
    let scores = match parsed {
        InferenceResponse::Nested(mut outer) => {
            if outer.is_empty() {
                return Err(ClassifierError::Empty);
            }
            outer.swap_remove(0)
        }
        InferenceResponse::Flat(scores) => scores,
    };

    let best = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(ClassifierError::Empty)?;
    best.label.parse()
}

pub struct HttpClassifierAdapter {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpClassifierAdapter {
    pub fn new(
        endpoint: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }
}

impl ClassifierPort for HttpClassifierAdapter {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_response(&body)
    }
}
