//! Prompts sent to the generative model.

/// Sentiment classification prompt. `{text}` is replaced with the input.
pub const SENTIMENT_PROMPT: &str = r#"Analyze the sentiment of the following text: '{text}'.
Respond STRICTLY in the following JSON format:
{"sentiment": "POSITIVE" | "NEGATIVE" | "NEUTRAL", "confidence": "HIGH" | "MEDIUM" | "LOW"}
Do not include any other text or markdown formatting."#;

/// Summary prompt. `{text}` is replaced with the (truncated) input.
pub const SUMMARY_PROMPT: &str = r#"Summarize the following text in 2-3 concise sentences: '{text}'.
Keep it plain text."#;

pub fn sentiment_prompt(text: &str) -> String {
    SENTIMENT_PROMPT.replace("{text}", text)
}

pub fn summary_prompt(text: &str) -> String {
    SUMMARY_PROMPT.replace("{text}", text)
}
