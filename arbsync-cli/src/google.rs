//! Google Translate clients.
//!
//! The free client uses the unauthenticated `translate_a/single` endpoint,
//! which allows roughly 100 requests per hour. The paid client uses the
//! Cloud Translation v2 API and needs an API key.

use std::time::Duration;

use arbsync::{Error, Language, TranslationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const FREE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const PAID_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FREE_LIMIT_MESSAGE: &str =
    "You have used up all of your free translation usage. (approximately 100 per hour)";

fn build_client() -> Result<Client, Error> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::translation_failure(format!("Failed to create HTTP client: {e}")))
}

fn network_error(e: reqwest::Error) -> Error {
    Error::translation_failure(format!("Network error: {e}"))
}

#[derive(Debug, Deserialize)]
struct FreeResponse {
    #[serde(default)]
    sentences: Vec<Sentence>,
    #[serde(default)]
    dict: Vec<Dictionary>,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    #[serde(default)]
    trans: String,
}

#[derive(Debug, Deserialize)]
struct Dictionary {
    #[serde(default)]
    terms: Vec<String>,
}

impl FreeResponse {
    fn into_text(self) -> Result<String, Error> {
        if !self.sentences.is_empty() {
            return Ok(self.sentences.into_iter().map(|s| s.trans).collect());
        }
        self.dict
            .into_iter()
            .next()
            .and_then(|d| d.terms.into_iter().next())
            .ok_or_else(|| Error::translation_failure("Empty response from the free translation API"))
    }
}

/// Unauthenticated Google Translate.
pub struct FreeGoogleTranslator {
    client: Client,
}

impl FreeGoogleTranslator {
    pub fn new() -> Result<Self, Error> {
        Ok(FreeGoogleTranslator {
            client: build_client()?,
        })
    }
}

#[async_trait]
impl TranslationProvider for FreeGoogleTranslator {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String, Error> {
        debug!(source = source.provider_code, target = target.provider_code, "free translate");
        let response = self
            .client
            .get(FREE_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", source.provider_code),
                ("tl", target.provider_code),
                ("dt", "t"),
                ("dj", "1"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(Error::translation_failure(FREE_LIMIT_MESSAGE)),
            status if !status.is_success() => Err(Error::translation_failure(format!(
                "Free translation API responded with {status}"
            ))),
            _ => response
                .json::<FreeResponse>()
                .await
                .map_err(network_error)?
                .into_text(),
        }
    }

    fn provider_name(&self) -> &str {
        "google-free"
    }
}

#[derive(Debug, Deserialize)]
struct PaidResponse {
    data: Option<PaidData>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct PaidData {
    translations: Vec<PaidTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaidTranslation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl PaidResponse {
    fn into_text(self) -> Result<String, Error> {
        if let Some(error) = self.error {
            return Err(Error::translation_failure(error.message));
        }
        self.data
            .and_then(|d| d.translations.into_iter().next())
            .map(|t| t.translated_text)
            .ok_or_else(|| Error::translation_failure("Empty response from the Cloud Translation API"))
    }
}

/// Google Cloud Translation v2.
pub struct PaidGoogleTranslator {
    client: Client,
    api_key: String,
}

impl PaidGoogleTranslator {
    /// Fails with [`Error::ApiKeyRequired`] for an empty key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ApiKeyRequired);
        }
        Ok(PaidGoogleTranslator {
            client: build_client()?,
            api_key,
        })
    }
}

/// Whether `text` looks like it contains an HTML tag.
pub fn has_html_tags(text: &str) -> bool {
    text.find('<')
        .is_some_and(|start| text[start + 1..].contains('>'))
}

#[async_trait]
impl TranslationProvider for PaidGoogleTranslator {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String, Error> {
        debug!(source = source.provider_code, target = target.provider_code, "paid translate");
        let format = if has_html_tags(text) { "html" } else { "text" };
        let response = self
            .client
            .get(PAID_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", text),
                ("target", target.provider_code),
                ("source", source.provider_code),
                ("alt", "json"),
                ("format", format),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        match serde_json::from_str::<PaidResponse>(&body) {
            Ok(parsed) => parsed.into_text(),
            Err(_) => Err(Error::translation_failure(format!(
                "Cloud Translation API responded with {status}"
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        "google-paid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_response_concatenates_sentences() {
        let response: FreeResponse =
            serde_json::from_str(r#"{"sentences": [{"trans": "Bonjour. "}, {"trans": "Au revoir."}, {"orig": "x"}]}"#)
                .unwrap();
        assert_eq!(response.into_text().unwrap(), "Bonjour. Au revoir.");
    }

    #[test]
    fn test_free_response_falls_back_to_dictionary() {
        let response: FreeResponse = serde_json::from_str(r#"{"dict": [{"terms": ["chat", "matou"]}]}"#).unwrap();
        assert_eq!(response.into_text().unwrap(), "chat");
    }

    #[test]
    fn test_paid_response_surfaces_api_errors() {
        let ok: PaidResponse =
            serde_json::from_str(r#"{"data": {"translations": [{"translatedText": "Hallo"}]}}"#).unwrap();
        assert_eq!(ok.into_text().unwrap(), "Hallo");

        let failed: PaidResponse =
            serde_json::from_str(r#"{"error": {"code": 400, "message": "API key not valid."}}"#).unwrap();
        match failed.into_text() {
            Err(Error::TranslationFailure(message)) => assert_eq!(message, "API key not valid."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_paid_translator_requires_key() {
        assert!(matches!(PaidGoogleTranslator::new("  "), Err(Error::ApiKeyRequired)));
    }

    #[test]
    fn test_has_html_tags() {
        assert!(has_html_tags("Click <b>here</b>"));
        assert!(!has_html_tags("a < b"));
        assert!(!has_html_tags("plain"));
    }
}
