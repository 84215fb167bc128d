use serde::{Deserialize, Serialize};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};
use std::collections::BTreeMap;

use crate::error::{PaperdeskError, Result};

/// Structured peer review.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Overall score (0-10).
    pub score: f64,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub weaknesses: Vec<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,

    /// Per-category narrative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed: Option<BTreeMap<String, String>>,

    /// Per-category scores (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<BTreeMap<String, f64>>,

    /// Reviewer confidence, only when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ReviewResult {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_score(self.score)
    }
}

/// Editorial decision derived from the overall score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Accept,
    Revise,
    Reject,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Recommendation::Accept
        } else if score >= 6.0 {
            Recommendation::Revise
        } else {
            Recommendation::Reject
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Accept => write!(f, "Accept"),
            Recommendation::Revise => write!(f, "Revise"),
            Recommendation::Reject => write!(f, "Reject"),
        }
    }
}

/// Quality band used when colouring a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Good
        } else if score >= 6.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

/// The three shapes the review endpoint is known to answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewPayload {
    Structured(ReviewResult),
    /// A string that is not JSON. Shown to the user, never parsed further.
    PlainText(String),
}

impl ReviewPayload {
    /// Interpret the raw `review` field of a successful response.
    ///
    /// An object is used directly, a string is parsed as JSON once, and a
    /// string that is not JSON is kept as plain text. An object (direct or
    /// decoded) that lacks the review fields is malformed.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(text) => {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(decoded @ serde_json::Value::Object(_)) => {
                        Ok(ReviewPayload::Structured(parse_structured(decoded)?))
                    }
                    _ => Ok(ReviewPayload::PlainText(text)),
                }
            }
            obj @ serde_json::Value::Object(_) => {
                Ok(ReviewPayload::Structured(parse_structured(obj)?))
            }
            other => Err(PaperdeskError::MalformedPayload(format!(
                "review must be an object or string, got {other}"
            ))),
        }
    }
}

fn parse_structured(value: serde_json::Value) -> Result<ReviewResult> {
    serde_json::from_value(value).map_err(|e| {
        PaperdeskError::MalformedPayload(format!("Received invalid review format: {e}"))
    })
}
