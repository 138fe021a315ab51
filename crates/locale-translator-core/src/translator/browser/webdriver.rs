use async_trait::async_trait;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::page::{DomError, DomResult, PageLauncher, PickerSide, TranslatePage};
use crate::config::BrowserConfig;
use crate::error::{Error, Result};

const CONSENT_BUTTON: &str =
    "button[aria-label='Agree to the use of cookies and other data for the purposes described']";
const SOURCE_PICKER: &str = "button[aria-label='More source languages']";
const TARGET_PICKER: &str = "button[aria-label='More target languages']";
const SOURCE_INPUT: &str = "textarea[aria-label='Source text']";
const RESULT_SURFACE: &str = "//div[string-length(@data-text)>0]";

// WebDriver key codepoints
const KEY_CONTROL: char = '\u{e009}';
const KEY_DELETE: char = '\u{e017}';

/// Launches Chrome sessions on a WebDriver endpoint
pub struct WebDriverLauncher {
    config: BrowserConfig,
}

impl WebDriverLauncher {
    pub const fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        if self.config.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--window-size=1280,900"] }),
            );
        }
        caps
    }
}

#[async_trait]
impl PageLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn TranslatePage>> {
        debug!("Connecting to WebDriver at {}", self.config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|e| Error::Browser(format!("failed to start browser session: {e}")))?;

        let timeouts = TimeoutConfiguration::new(None, None, Some(self.config.implicit_wait()));
        if let Err(e) = client.update_timeouts(timeouts).await {
            let _ = client.close().await;
            return Err(Error::Browser(format!("failed to set implicit wait: {e}")));
        }

        Ok(Box::new(WebDriverPage { client }))
    }
}

/// A Google Translate page in a live WebDriver session
struct WebDriverPage {
    client: Client,
}

fn dom_error(err: CmdError) -> DomError {
    match err {
        CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::StaleElementReference) => DomError::StaleElement,
        CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::NoSuchElement) => DomError::NoSuchElement,
        other => DomError::Driver(other.to_string()),
    }
}

/// XPath for option rows whose label is exactly `name`
fn language_option_xpath(name: &str) -> String {
    format!("//div[.//div[text()='{name}']]")
}

#[async_trait]
impl TranslatePage for WebDriverPage {
    async fn navigate(&self, url: &str) -> DomResult<()> {
        self.client.goto(url).await.map_err(dom_error)
    }

    async fn dismiss_consent(&self) -> DomResult<bool> {
        let buttons = self
            .client
            .find_all(Locator::Css(CONSENT_BUTTON))
            .await
            .map_err(dom_error)?;
        match buttons.into_iter().next() {
            Some(button) => {
                button.click().await.map_err(dom_error)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn open_language_picker(&self, side: PickerSide) -> DomResult<()> {
        let selector = match side {
            PickerSide::Source => SOURCE_PICKER,
            PickerSide::Target => TARGET_PICKER,
        };
        let button = self.client.find(Locator::Css(selector)).await.map_err(dom_error)?;
        button.click().await.map_err(dom_error)
    }

    async fn choose_language(&self, display_name: &str) -> DomResult<bool> {
        let xpath = language_option_xpath(display_name);
        let candidates = self
            .client
            .find_all(Locator::XPath(&xpath))
            .await
            .map_err(dom_error)?;

        for candidate in candidates {
            // options re-render while the list animates; skip the ones that vanish
            let code = match candidate.attr("data-language-code").await {
                Ok(code) => code.unwrap_or_default(),
                Err(e) if dom_error_is_stale(&e) => continue,
                Err(e) => return Err(dom_error(e)),
            };
            if code.is_empty() {
                continue;
            }
            match candidate.is_displayed().await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) if dom_error_is_stale(&e) => continue,
                Err(e) => return Err(dom_error(e)),
            }
            candidate.click().await.map_err(dom_error)?;
            return Ok(true);
        }

        Ok(false)
    }

    async fn clear_source(&self) -> DomResult<()> {
        let input = self.client.find(Locator::Css(SOURCE_INPUT)).await.map_err(dom_error)?;
        input
            .send_keys(&format!("{KEY_CONTROL}a{KEY_CONTROL}"))
            .await
            .map_err(dom_error)?;
        input.send_keys(&KEY_DELETE.to_string()).await.map_err(dom_error)
    }

    async fn type_source(&self, text: &str) -> DomResult<()> {
        let input = self.client.find(Locator::Css(SOURCE_INPUT)).await.map_err(dom_error)?;
        input.send_keys(text).await.map_err(dom_error)
    }

    async fn result_text(&self) -> DomResult<Option<String>> {
        let surfaces = self
            .client
            .find_all(Locator::XPath(RESULT_SURFACE))
            .await
            .map_err(dom_error)?;
        let Some(surface) = surfaces.into_iter().next() else {
            return Ok(None);
        };
        let text = surface.attr("data-text").await.map_err(dom_error)?;
        Ok(text.filter(|t| !t.is_empty()))
    }

    async fn quit(&self) -> DomResult<()> {
        self.client.clone().close().await.map_err(dom_error)
    }
}

fn dom_error_is_stale(err: &CmdError) -> bool {
    matches!(err, CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::StaleElementReference))
}
