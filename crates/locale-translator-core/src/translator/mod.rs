pub mod browser;
mod libre;
mod traits;

pub use browser::BrowserEngine;
pub use libre::{LanguageTable, LibreTranslateEngine};
pub use traits::{EngineInfo, TranslationEngine, TranslationResult};

use crate::config::{AppConfig, EngineKind};
use crate::error::Result;
use std::sync::Arc;

/// Create the configured translation engine
pub fn create_engine(config: &AppConfig) -> Result<Arc<dyn TranslationEngine>> {
    let engine: Arc<dyn TranslationEngine> = match config.engine {
        EngineKind::Browser => Arc::new(BrowserEngine::new(config.browser.clone())),
        EngineKind::Libre => Arc::new(LibreTranslateEngine::new(&config.libre)?),
    };

    Ok(engine)
}
