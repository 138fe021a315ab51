use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;
use crate::language::Language;

/// Information about a translation backend
#[derive(Debug, Clone)]
pub struct EngineInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Whether this engine needs a running WebDriver endpoint
    pub requires_webdriver: bool,
}

/// One translated unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_language: Language,
    pub target_language: Language,
}

impl TranslationResult {
    pub fn new(translated_text: impl Into<String>, source_language: Language, target_language: Language) -> Self {
        Self {
            translated_text: translated_text.into(),
            source_language,
            target_language,
        }
    }
}

/// Trait for translation backends
///
/// Callers depend only on this capability, never on which backend serves it.
/// A call with `source == target` is valid; backends simply translate.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Get information about this engine
    fn info(&self) -> EngineInfo;

    /// Get the engine name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate a single text
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<TranslationResult>;

    /// Translate independent texts; results come back in input order.
    async fn translate_many(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<TranslationResult>>;

    /// Translate every string leaf of a nested document, keeping its shape.
    async fn translate_document(&self, doc: Document, source: Language, target: Language) -> Result<Document>;
}
