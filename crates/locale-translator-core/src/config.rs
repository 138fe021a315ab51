use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::language::Language;

// Serde default functions
const fn default_source_lang() -> Language {
    Language::English
}

/// Which translation backend to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Script the translation web page over WebDriver
    #[default]
    Browser,
    /// Call a LibreTranslate-compatible HTTP API
    Libre,
}

/// Browser automation settings.
///
/// All durations are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Translation page root
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// Implicit element-lookup timeout applied to the session
    #[serde(default = "default_implicit_wait_ms")]
    pub implicit_wait_ms: u64,

    /// Upper bound for every explicit wait
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Delay between polls of an explicit wait
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pause between source and target language selection
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Pause before each document leaf
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_url() -> String {
    "https://translate.google.com/".to_string()
}

const fn default_implicit_wait_ms() -> u64 {
    1000
}

const fn default_wait_timeout_ms() -> u64 {
    15_000
}

const fn default_poll_interval_ms() -> u64 {
    100
}

const fn default_settle_delay_ms() -> u64 {
    300
}

const fn default_item_delay_ms() -> u64 {
    1000
}

impl BrowserConfig {
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub const fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            page_url: default_page_url(),
            headless: false,
            implicit_wait_ms: default_implicit_wait_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            item_delay_ms: default_item_delay_ms(),
        }
    }
}

/// LibreTranslate API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibreConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_api_base() -> String {
    "https://libretranslate.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl LibreConfig {
    /// Create a new API config with default timeouts and retries
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            ..Self::default()
        }
    }
}

impl Default for LibreConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language documents are written in
    #[serde(default = "default_source_lang")]
    pub source_lang: Language,

    /// Languages to translate into (empty = every other language)
    #[serde(default)]
    pub target_langs: Vec<Language>,

    /// Translation backend
    #[serde(default)]
    pub engine: EngineKind,

    /// Directory translated files are written to (defaults to the working directory)
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub libre: LibreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_langs: Vec::new(),
            engine: EngineKind::default(),
            output_dir: None,
            browser: BrowserConfig::default(),
            libre: LibreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/locale-translator/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("locale-translator").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Reject values that would make every wait or request fail immediately.
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &str, reason: &str) -> Error {
            Error::ConfigInvalid {
                field: field.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.browser.webdriver_url.trim().is_empty() {
            return Err(invalid("browser.webdriver_url", "must not be empty"));
        }
        if self.browser.page_url.trim().is_empty() {
            return Err(invalid("browser.page_url", "must not be empty"));
        }
        if self.browser.wait_timeout_ms == 0 {
            return Err(invalid("browser.wait_timeout_ms", "must be greater than zero"));
        }
        if self.browser.poll_interval_ms == 0 {
            return Err(invalid("browser.poll_interval_ms", "must be greater than zero"));
        }
        if self.libre.api_base.trim().is_empty() {
            return Err(invalid("libre.api_base", "must not be empty"));
        }
        if self.libre.timeout_secs == 0 {
            return Err(invalid("libre.timeout_secs", "must be greater than zero"));
        }
        Ok(())
    }

    /// Directory output files land in
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Source and target languages for a run, falling back to the configured
    /// ones for whatever the caller leaves out. An empty target list still
    /// means every language except the source.
    pub fn run_languages(&self, source: Option<Language>, targets: Vec<Language>) -> (Language, Vec<Language>) {
        let source = source.unwrap_or(self.source_lang);
        let targets = if targets.is_empty() {
            self.target_langs.clone()
        } else {
            targets
        };
        (source, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source_lang, Language::English);
        assert!(config.target_langs.is_empty());
        assert_eq!(config.engine, EngineKind::Browser);
        assert_eq!(config.browser.wait_timeout(), Duration::from_secs(15));
        assert_eq!(config.browser.settle_delay(), Duration::from_millis(300));
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            source_lang = "French"
            target_langs = ["de", "Japanese"]
            engine = "libre"

            [browser]
            headless = true
            wait_timeout_ms = 5000

            [libre]
            api_base = "http://localhost:5000"
            "#,
        )
        .unwrap();

        assert_eq!(config.source_lang, Language::French);
        assert_eq!(config.target_langs, vec![Language::German, Language::Japanese]);
        assert_eq!(config.engine, EngineKind::Libre);
        assert!(config.browser.headless);
        assert_eq!(config.browser.wait_timeout_ms, 5000);
        assert_eq!(config.browser.poll_interval_ms, 100);
        assert_eq!(config.libre.api_base, "http://localhost:5000");
        assert_eq!(config.libre.retry_count, 3);
    }

    #[test]
    fn test_run_languages_fall_back_to_config() {
        let config = AppConfig {
            source_lang: Language::French,
            target_langs: vec![Language::German, Language::Japanese],
            ..AppConfig::default()
        };

        assert_eq!(
            config.run_languages(None, Vec::new()),
            (Language::French, vec![Language::German, Language::Japanese])
        );
        assert_eq!(
            config.run_languages(Some(Language::English), vec![Language::Spanish]),
            (Language::English, vec![Language::Spanish])
        );

        let defaults = AppConfig::default();
        assert_eq!(defaults.run_languages(None, Vec::new()), (Language::English, Vec::new()));
    }

    #[test]
    fn test_zero_wait_timeout_is_rejected() {
        let err = AppConfig::from_toml("[browser]\nwait_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref field, .. } if field == "browser.wait_timeout_ms"));
    }

    #[test]
    fn test_unknown_language_fails_to_load() {
        let err = AppConfig::from_toml("source_lang = \"Klingon\"").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }
}
