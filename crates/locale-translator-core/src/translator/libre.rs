use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::traits::{EngineInfo, TranslationEngine, TranslationResult};
use crate::config::LibreConfig;
use crate::document::{Document, LeafTranslator, translate_document_with};
use crate::error::{Error, Result};
use crate::language::Language;

/// Language code table reported by the API
pub type LanguageTable = HashMap<Language, String>;

/// LibreTranslate API translator
pub struct LibreTranslateEngine {
    client: Client,
    /// Base URL for the API (e.g., "https://libretranslate.com")
    pub api_base: String,
    /// API key sent with every translation request (empty when unset)
    pub api_key: Option<String>,
    /// Attempts per request when rate limited
    pub retry_count: u32,
    /// Delay between retries in milliseconds
    pub retry_delay_ms: u64,
    /// Upper bound on any single wait between retries, in milliseconds
    pub max_retry_wait_ms: u64,
    languages: OnceCell<LanguageTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ApiLanguage {
    code: String,
    name: String,
}

impl LibreTranslateEngine {
    pub fn new(config: &LibreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            retry_count: config.retry_count.max(1),
            retry_delay_ms: config.retry_delay_ms,
            max_retry_wait_ms: config.timeout_secs.saturating_mul(1000),
            languages: OnceCell::new(),
        })
    }

    /// Use a known language table instead of fetching `/languages`
    pub fn with_languages(mut self, languages: LanguageTable) -> Self {
        self.languages = OnceCell::new_with(Some(languages));
        self
    }

    /// The API's language table, fetched on first use and kept for the
    /// lifetime of the engine.
    pub async fn languages(&self) -> Result<&LanguageTable> {
        self.languages.get_or_try_init(|| self.fetch_languages()).await
    }

    async fn fetch_languages(&self) -> Result<LanguageTable> {
        let url = format!("{}/languages", self.api_base);
        debug!("Fetching language table from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!("HTTP {status}: {body}")));
        }

        let body = response.text().await.map_err(|e| Error::Request(e.to_string()))?;
        let listed: Vec<ApiLanguage> = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("unable to parse languages result: {e}")))?;

        let table: LanguageTable = listed
            .into_iter()
            .filter_map(|lang| Language::from_name(&lang.name).map(|known| (known, lang.code)))
            .collect();
        info!("LibreTranslate supports {} known languages", table.len());
        Ok(table)
    }

    async fn iso_code(&self, language: Language) -> Result<String> {
        self.languages()
            .await?
            .get(&language)
            .cloned()
            .ok_or(Error::UnsupportedLanguage(language))
    }

    /// Pause before the next attempt: the server's `Retry-After` seconds when
    /// given, else the configured delay, never longer than the request timeout.
    fn retry_wait(&self, retry_after: Option<u64>) -> Duration {
        let wait = retry_after.map_or(self.retry_delay_ms, |secs| secs.saturating_mul(1000));
        Duration::from_millis(wait.min(self.max_retry_wait_ms))
    }

    /// Make API request with retry logic
    async fn request_with_retry(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate", self.api_base);
        let api_key = self.api_key.as_deref().unwrap_or("");
        let form = [
            ("q", text),
            ("source", source),
            ("target", target),
            ("format", "text"),
            ("api_key", api_key),
        ];

        let mut last_error = None;

        for attempt in 0..self.retry_count {
            debug!(
                "Translation request attempt {}/{} to {}",
                attempt + 1,
                self.retry_count,
                url
            );

            let response = match self.client.post(&url).form(&form).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    return Err(Error::Translation(format!("request to {url} timed out")));
                }
                Err(e) => return Err(Error::Request(e.to_string())),
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());

                warn!("Rate limited, retry after {:?}s", retry_after);
                last_error = Some(Error::RateLimited { retry_after });

                if attempt + 1 < self.retry_count {
                    tokio::time::sleep(self.retry_wait(retry_after)).await;
                }
                continue;
            }

            let status = response.status();
            let body = response.text().await.map_err(|e| Error::Request(e.to_string()))?;
            if !status.is_success() {
                warn!("API error: {} - {}", status, body);
                return Err(Error::Request(format!("HTTP {status}: {body}")));
            }

            let parsed: TranslateResponse = serde_json::from_str(&body)
                .map_err(|e| Error::Parse(format!("unable to parse translate result: {e}")))?;
            return Ok(parsed.translated_text);
        }

        error!("Translation failed after {} attempts", self.retry_count);
        Err(last_error.unwrap_or_else(|| Error::Translation("no attempts made".to_string())))
    }

    async fn translate_text(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let source_code = self.iso_code(source).await?;
        let target_code = self.iso_code(target).await?;

        self.request_with_retry(text, &source_code, &target_code)
            .await
            .inspect_err(|e| {
                error!("An error occurred translating '{}' from {} to {}: {}", text, source, target, e);
            })
    }
}

#[async_trait]
impl TranslationEngine for LibreTranslateEngine {
    fn info(&self) -> EngineInfo {
        EngineInfo {
            name: "LibreTranslate",
            requires_webdriver: false,
        }
    }

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<TranslationResult> {
        let translated = self.translate_text(text, source, target).await?;
        Ok(TranslationResult::new(translated, source, target))
    }

    async fn translate_many(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<TranslationResult>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, source, target).await?);
        }
        Ok(results)
    }

    async fn translate_document(&self, doc: Document, source: Language, target: Language) -> Result<Document> {
        let mut leaves = ApiLeaves {
            engine: self,
            source,
            target,
        };
        translate_document_with(doc, &mut leaves).await
    }
}

/// Leaf adapter that sends each document string as its own request
struct ApiLeaves<'a> {
    engine: &'a LibreTranslateEngine,
    source: Language,
    target: Language,
}

#[async_trait]
impl LeafTranslator for ApiLeaves<'_> {
    async fn translate_leaf(&mut self, text: &str) -> Result<String> {
        self.engine.translate_text(text, self.source, self.target).await
    }
}
