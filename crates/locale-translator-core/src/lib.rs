//! Locale Translator Core Library
//!
//! This library provides the core functionality for translating text and
//! JSON localization files:
//! - A translation engine capability with two backends: browser automation
//!   over WebDriver and the LibreTranslate HTTP API
//! - A structure-preserving walk over nested JSON documents
//! - Per-language file translation with failure isolation

pub mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod service;
pub mod translator;
pub mod util;

pub use config::{AppConfig, BrowserConfig, EngineKind, LibreConfig};
pub use document::{Document, LeafTranslator, translate_document_with};
pub use error::{Error, Result};
pub use language::{Language, ParseLanguageError};
pub use service::{BatchReport, DocumentTranslator, FileTranslationResult, LanguageOutcome};
pub use translator::{
    BrowserEngine, EngineInfo, LanguageTable, LibreTranslateEngine, TranslationEngine, TranslationResult, create_engine,
};

/// Build a [`DocumentTranslator`] for the configured engine and output directory
pub fn document_translator(config: &AppConfig) -> Result<DocumentTranslator> {
    let engine = create_engine(config)?;
    Ok(DocumentTranslator::with_output_dir(engine, config.output_dir()))
}
