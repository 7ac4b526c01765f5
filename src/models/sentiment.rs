//! Sentiment labels and the sentinel outcomes of an AI classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence reported when no real classification is available.
pub const CONFIDENCE_NONE: &str = "None";
/// Confidence reported when the provider blocked the request.
pub const CONFIDENCE_FILTERS_TRIGGERED: &str = "Filters Triggered";
/// Confidence reported when the provider returned no readable content.
pub const CONFIDENCE_CONTENT_BLOCKED: &str = "Content Blocked";
/// Confidence reported when the model reply could not be decoded.
pub const CONFIDENCE_PARSE_ERROR: &str = "Low - Parse Error";

/// Sentiment label stored on a record.
///
/// The first three variants are what the model is asked to answer. The rest
/// are sentinels produced locally when the classification could not be made.
/// Labels outside this vocabulary are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// The reply could not be parsed.
    #[default]
    Unknown,
    /// The provider flagged the request as blocked.
    Blocked,
    /// The provider returned no accessible content.
    AiError,
    /// Transport or provider-level failure.
    ApiError,
    /// No credential, or an unexpected failure.
    Error,
    /// The provider was not consulted.
    Skipped,
    Other(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Unknown => "UNKNOWN",
            Self::Blocked => "BLOCKED",
            Self::AiError => "AI_ERROR",
            Self::ApiError => "API ERROR",
            Self::Error => "ERROR",
            Self::Skipped => "SKIPPED",
            Self::Other(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            "NEUTRAL" => Self::Neutral,
            "UNKNOWN" => Self::Unknown,
            "BLOCKED" => Self::Blocked,
            "AI_ERROR" => Self::AiError,
            "API ERROR" => Self::ApiError,
            "ERROR" => Self::Error,
            "SKIPPED" => Self::Skipped,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for the three labels the model is asked to choose from.
    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Positive | Self::Negative | Self::Neutral)
    }
}

impl From<String> for Sentiment {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<Sentiment> for String {
    fn from(s: Sentiment) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment plus the confidence string that came with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub confidence: String,
}

impl SentimentResult {
    pub fn new(sentiment: Sentiment, confidence: impl Into<String>) -> Self {
        Self {
            sentiment,
            confidence: confidence.into(),
        }
    }

    pub fn error() -> Self {
        Self::new(Sentiment::Error, CONFIDENCE_NONE)
    }

    pub fn blocked() -> Self {
        Self::new(Sentiment::Blocked, CONFIDENCE_FILTERS_TRIGGERED)
    }

    pub fn content_blocked() -> Self {
        Self::new(Sentiment::AiError, CONFIDENCE_CONTENT_BLOCKED)
    }

    pub fn parse_error() -> Self {
        Self::new(Sentiment::Unknown, CONFIDENCE_PARSE_ERROR)
    }

    pub fn api_error() -> Self {
        Self::new(Sentiment::ApiError, CONFIDENCE_NONE)
    }

    pub fn skipped() -> Self {
        Self::new(Sentiment::Skipped, CONFIDENCE_NONE)
    }
}
