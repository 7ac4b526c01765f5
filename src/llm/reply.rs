//! Decoding of `generateContent` replies and classification of the outcome.
//!
//! The precedence is fixed: missing key, explicit block, missing content,
//! undecodable JSON (including missing keys), transport failure, anything
//! else. A reply that decodes is passed through without checking its labels.

use serde::Deserialize;
use tracing::{debug, error, warn};

use super::error::LlmError;
use super::provider::{SUMMARY_EMPTY, SUMMARY_ERROR};
use crate::models::{Sentiment, SentimentResult};
use crate::utils::value_to_string;

/// `generateContent` response body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Reduce a response body to its reply text.
pub fn interpret_response(response: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .filter(|r| !r.is_empty())
    {
        return Err(LlmError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("no candidates returned".to_string()))?;

    let finish_reason = candidate
        .finish_reason
        .unwrap_or_else(|| "unknown".to_string());

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "no text in candidate (finish reason: {})",
            finish_reason
        )));
    }

    Ok(texts.concat().trim().to_string())
}

/// Drop a surrounding fenced code block, if the reply starts with one.
pub fn strip_code_fence(text: &str) -> String {
    let text = text.trim();
    if !text.starts_with("```") {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().is_some_and(|l| l.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.starts_with("```")) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

/// Parse the model's JSON answer into a sentiment result.
pub fn parse_sentiment_reply(text: &str) -> Result<SentimentResult, LlmError> {
    let cleaned = strip_code_fence(text);
    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(|e| LlmError::Parse(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| LlmError::Parse("expected a JSON object".to_string()))?;

    let sentiment = object
        .get("sentiment")
        .ok_or_else(|| LlmError::Parse("missing key 'sentiment'".to_string()))?;
    let confidence = object
        .get("confidence")
        .ok_or_else(|| LlmError::Parse("missing key 'confidence'".to_string()))?;

    Ok(SentimentResult::new(
        Sentiment::from(value_to_string(sentiment)),
        value_to_string(confidence),
    ))
}

/// Map the outcome of a sentiment request to the value stored on the record.
pub fn classify_outcome(outcome: Result<String, LlmError>) -> SentimentResult {
    let raw = match outcome {
        Ok(raw) => raw,
        Err(e) => return classify_error(&e),
    };
    debug!("Received raw response: {}", raw);

    match parse_sentiment_reply(&raw) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to parse AI response as JSON: {} (raw: {:?})", e, raw);
            SentimentResult::parse_error()
        }
    }
}

/// Map the outcome of a summary request to the text stored on the record.
pub fn summary_from_outcome(outcome: Result<String, LlmError>) -> String {
    match outcome {
        Ok(summary) if !summary.is_empty() => summary,
        Ok(_) => SUMMARY_EMPTY.to_string(),
        Err(e) => {
            error!("Summary generation failed: {}", e);
            SUMMARY_ERROR.to_string()
        }
    }
}

fn classify_error(e: &LlmError) -> SentimentResult {
    match e {
        LlmError::MissingApiKey => {
            error!("Attempted analysis without API Key.");
            SentimentResult::error()
        }
        LlmError::Blocked(reason) => {
            warn!("Response blocked: {}", reason);
            SentimentResult::blocked()
        }
        LlmError::EmptyResponse(detail) => {
            error!("Gemini response empty/blocked: {}", detail);
            SentimentResult::content_blocked()
        }
        LlmError::Parse(detail) => {
            error!("Failed to parse AI response as JSON: {}", detail);
            SentimentResult::parse_error()
        }
        LlmError::Connection(detail) | LlmError::Api(detail) => {
            error!("Gemini API Error: {}", detail);
            SentimentResult::api_error()
        }
        LlmError::Unexpected(detail) => {
            error!("Unexpected AI Error: {}", detail);
            SentimentResult::error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CONFIDENCE_CONTENT_BLOCKED, CONFIDENCE_PARSE_ERROR};

    fn response(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_interpret_plain_reply() {
        let r = response(
            r#"{"candidates":[{"content":{"parts":[{"text":"  {\"a\":1}\n"}],"role":"model"},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(interpret_response(r).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_interpret_explicit_block() {
        let r = response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(interpret_response(r), Err(LlmError::Blocked(reason)) if reason == "SAFETY"));
    }

    #[test]
    fn test_interpret_candidate_without_parts() {
        let r = response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(
            interpret_response(r),
            Err(LlmError::EmptyResponse(_))
        ));
        assert!(matches!(
            interpret_response(response("{}")),
            Err(LlmError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_fenced_reply_parses_like_bare_json() {
        let bare = r#"{"sentiment": "POSITIVE", "confidence": "HIGH"}"#;
        let fenced = format!("```json\n{}\n```", bare);
        assert_eq!(
            parse_sentiment_reply(&fenced).unwrap(),
            parse_sentiment_reply(bare).unwrap()
        );
        assert_eq!(
            parse_sentiment_reply("```\n{\"sentiment\":\"NEUTRAL\",\"confidence\":\"LOW\"}\n```")
                .unwrap()
                .sentiment,
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = classify_outcome(Ok("I think it's positive!".to_string()));
        assert_eq!(result.sentiment, Sentiment::Unknown);
        assert_eq!(result.confidence, CONFIDENCE_PARSE_ERROR);
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let result = classify_outcome(Ok(r#"{"sentiment": "POSITIVE"}"#.to_string()));
        assert_eq!(result, SentimentResult::parse_error());
        let result = classify_outcome(Ok("[1, 2]".to_string()));
        assert_eq!(result, SentimentResult::parse_error());
    }

    #[test]
    fn test_out_of_vocabulary_values_pass_through() {
        let result =
            classify_outcome(Ok(r#"{"sentiment": "MIXED", "confidence": 0.7}"#.to_string()));
        assert_eq!(result.sentiment, Sentiment::Other("MIXED".to_string()));
        assert_eq!(result.confidence, "0.7");
    }

    #[test]
    fn test_error_precedence_mapping() {
        assert_eq!(
            classify_outcome(Err(LlmError::MissingApiKey)),
            SentimentResult::error()
        );
        assert_eq!(
            classify_outcome(Err(LlmError::Blocked("SAFETY".into()))),
            SentimentResult::blocked()
        );
        let empty = classify_outcome(Err(LlmError::EmptyResponse("x".into())));
        assert_eq!(empty.sentiment, Sentiment::AiError);
        assert_eq!(empty.confidence, CONFIDENCE_CONTENT_BLOCKED);
        assert_eq!(
            classify_outcome(Err(LlmError::Api("HTTP 429".into()))),
            SentimentResult::api_error()
        );
        assert_eq!(
            classify_outcome(Err(LlmError::Connection("refused".into()))),
            SentimentResult::api_error()
        );
        assert_eq!(
            classify_outcome(Err(LlmError::Unexpected("boom".into()))),
            SentimentResult::error()
        );
    }

    #[test]
    fn test_summary_outcome() {
        assert_eq!(
            summary_from_outcome(Ok("Short recap.".to_string())),
            "Short recap."
        );
        assert_eq!(summary_from_outcome(Ok(String::new())), SUMMARY_EMPTY);
        assert_eq!(
            summary_from_outcome(Err(LlmError::Api("HTTP 500".into()))),
            SUMMARY_ERROR
        );
        assert_eq!(
            summary_from_outcome(Err(LlmError::EmptyResponse("none".into()))),
            SUMMARY_ERROR
        );
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```"), "");
    }
}
