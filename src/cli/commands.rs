//! Non-interactive subcommands.

use anyhow::bail;
use console::style;

use text_analyzer::config::Settings;
use text_analyzer::llm::{GeminiClient, SentimentProvider};
use text_analyzer::models::Sentiment;

use super::app::App;
use super::render::{sentiment_style, Mark};
use super::ExportFormat;

/// Sentence used to check the service end to end.
pub const VERIFY_SENTENCE: &str = "This is a fantastic feature, I really enjoy using it!";

pub fn cmd_history(app: &App, limit: usize) -> anyhow::Result<()> {
    app.show_history(limit);
    Ok(())
}

pub async fn cmd_export(
    app: &App,
    format: ExportFormat,
    sheet: Option<String>,
    limit: usize,
) -> anyhow::Result<()> {
    app.export(format, sheet.as_deref(), limit).await
}

fn gemini_client(settings: &Settings) -> anyhow::Result<GeminiClient> {
    if !settings.gemini.has_api_key() {
        bail!("GEMINI_API_KEY not found.");
    }
    Ok(GeminiClient::new(settings.gemini.clone())?)
}

/// List models that support content generation.
pub async fn cmd_models(settings: &Settings) -> anyhow::Result<()> {
    let client = gemini_client(settings)?;

    println!(
        "{} Listing supported models for generateContent...",
        Mark::Step
    );
    let models = client.list_models().await?;
    if models.is_empty() {
        println!("{} No models found.", Mark::Warn);
    }
    for model in models {
        println!("  {} {}", Mark::Item, model);
    }
    Ok(())
}

/// Classify a known-positive sentence and report whether the service agrees.
pub async fn cmd_verify(settings: &Settings) -> anyhow::Result<()> {
    let client = gemini_client(settings)?;

    println!("{}", style("Verifying Gemini API Integration").bold());
    println!("Input Text: '{}'", VERIFY_SENTENCE);
    println!("\n{} Sending request to {}...", Mark::Step, client.name());

    let result = client.analyze_sentiment(VERIFY_SENTENCE).await;
    println!(
        "\nResponse: {} ({})",
        sentiment_style(&result.sentiment, result.sentiment.as_str()),
        result.confidence
    );

    match result.sentiment {
        Sentiment::Positive => {
            println!(
                "\n{} SUCCESS: Sentiment correctly identified as POSITIVE.",
                Mark::Done
            );
            Ok(())
        }
        Sentiment::Error | Sentiment::ApiError => {
            bail!("API Error occurred. Check your API Key and internet connection.")
        }
        other => {
            println!(
                "\n{} UNEXPECTED: Result {} was not POSITIVE as expected for this text.",
                Mark::Warn,
                other
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_analyzer::llm::GeminiConfig;

    fn keyless_settings() -> Settings {
        Settings {
            gemini: GeminiConfig::base_default(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_models_requires_key() {
        let err = cmd_models(&keyless_settings()).await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_verify_requires_key() {
        assert!(cmd_verify(&keyless_settings()).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_reports_api_failure() {
        let mut settings = keyless_settings();
        settings.gemini = GeminiConfig::base_default()
            .with_api_key("test-key")
            .with_endpoint("http://127.0.0.1:9");
        settings.gemini.timeout_secs = 5;

        let err = cmd_verify(&settings).await.unwrap_err();
        assert!(err.to_string().contains("API Error"));
    }
}
