use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use serde_json::Value;

/// Google's unauthenticated translate endpoint, the default service.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";

/// How the translation service is reached.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Base URL of the translate service. Overridable for tests and for
    /// self-hosted proxies.
    pub base_url: String,
    /// Source language hint; `auto` lets the service detect it.
    pub source: String,
    /// Target language.
    pub target: String,
    /// Per-request cap; an expired request takes the fallback path.
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TRANSLATE_URL.to_string(),
            source: "auto".to_string(),
            target: "en".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of one translation attempt. On service failure `text` is the
/// caller's input, verbatim.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    /// Source language the service detected, when it reported one.
    pub detected_source: Option<String>,
    /// True when the service failed and `text` is the untranslated input.
    pub fallback: bool,
}

impl Translation {
    /// A no-op result for paths that never reach the service.
    pub fn passthrough(text: &str) -> Self {
        Self {
            text: text.to_string(),
            detected_source: None,
            fallback: false,
        }
    }
}

/// Best-effort client for the translation service.
pub struct Translator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build the translation HTTP client")?;
        Ok(Self { client, config })
    }

    /// Translates `text`, or returns it unchanged when the service fails
    /// for any reason. The failure is logged and reported through
    /// `fallback`; it never propagates to the caller.
    pub async fn translate(&self, text: &str) -> Translation {
        match self.request(text).await {
            Ok((translated, detected_source)) => {
                debug!(
                    "Translated {} chars (detected source: {})",
                    text.chars().count(),
                    detected_source.as_deref().unwrap_or("unknown")
                );
                Translation {
                    text: translated,
                    detected_source,
                    fallback: false,
                }
            }
            Err(error) => {
                warn!("Translation failed, classifying the original text: {error:#}");
                Translation {
                    text: text.to_string(),
                    detected_source: None,
                    fallback: true,
                }
            }
        }
    }

    async fn request(&self, text: &str) -> Result<(String, Option<String>)> {
        let url = format!(
            "{}/translate_a/single",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.config.source.as_str()),
                ("tl", self.config.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("Translation request failed")?
            .error_for_status()
            .context("Translation service returned an error status")?;
        let body: Value = response
            .json()
            .await
            .context("Translation response was not JSON")?;
        parse_response(&body)
    }
}

/// Extracts the translated text and the detected source language from the
/// service's nested-array response:
/// `[[["translated", "original", ...], ...], ..., "detected-lang", ...]`.
fn parse_response(body: &Value) -> Result<(String, Option<String>)> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("translation response has no segment array"))?;
    let mut translated = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(piece);
        }
    }
    if translated.is_empty() {
        bail!("translation response contained no text");
    }
    let detected_source = body.get(2).and_then(Value::as_str).map(str::to_owned);
    Ok((translated, detected_source))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_concatenates_segments() {
        let body = json!([
            [
                ["We need ", "Nou bezwen ", null],
                ["water and food", "dlo ak manje", null]
            ],
            null,
            "ht"
        ]);
        let (translated, detected) = parse_response(&body).unwrap();
        assert_eq!(translated, "We need water and food");
        assert_eq!(detected.as_deref(), Some("ht"));
    }

    #[test]
    fn test_parse_without_detected_language() {
        let body = json!([[["hello", "hola"]]]);
        let (translated, detected) = parse_response(&body).unwrap();
        assert_eq!(translated, "hello");
        assert!(detected.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_segment_array() {
        assert!(parse_response(&json!({"error": true})).is_err());
        assert!(parse_response(&json!([])).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_translation() {
        assert!(parse_response(&json!([[], null, "en"])).is_err());
        assert!(parse_response(&json!([[[null, "x"]], null, "en"])).is_err());
    }
}
