//! Translation by scripting an interactive translation web page.
//!
//! The page offers no request/response correlation. The only signal that a
//! translation finished is that the previous result surface disappeared and a
//! new one with populated text appeared, so every item runs through
//! [`ItemState`]: `Idle -> Cleared -> Populated -> Extracted`.

mod page;
mod wait;
mod webdriver;

pub use page::{DomError, DomResult, PageLauncher, PickerSide, TranslatePage};
pub use wait::WaitPolicy;
pub use webdriver::WebDriverLauncher;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::traits::{EngineInfo, TranslationEngine, TranslationResult};
use crate::config::BrowserConfig;
use crate::document::{Document, LeafTranslator, translate_document_with};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::util::preview;

/// Progress of one text through the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// Nothing done yet; the previous result may still be shown
    Idle,
    /// Input emptied and no result surface left on the page
    Cleared,
    /// Text typed and a result surface read
    Populated(String),
    /// Result accepted as the translation
    Extracted(String),
}

/// Engine that drives a browser through [`PageLauncher`] pages.
///
/// Every public operation opens its own session for the requested language
/// pair and closes it before returning, whatever the outcome.
pub struct BrowserEngine {
    launcher: Arc<dyn PageLauncher>,
    config: BrowserConfig,
}

impl BrowserEngine {
    /// Engine backed by a real WebDriver endpoint
    pub fn new(config: BrowserConfig) -> Self {
        let launcher = Arc::new(WebDriverLauncher::new(config.clone()));
        Self::with_launcher(launcher, config)
    }

    /// Engine backed by a custom page launcher
    pub fn with_launcher(launcher: Arc<dyn PageLauncher>, config: BrowserConfig) -> Self {
        Self { launcher, config }
    }

    const fn waits(&self) -> WaitPolicy {
        WaitPolicy::new(self.config.wait_timeout(), self.config.poll_interval())
    }

    /// Launch a browser and bring the page to the Ready state for one language pair.
    ///
    /// The caller owns the returned session and must [`Session::close`] it.
    /// If preparation fails the browser is quit before the error is returned.
    pub async fn open_session(&self, source: Language, target: Language) -> Result<Session> {
        info!("Opening browser session for {} -> {}", source, target);
        let page = self.launcher.launch().await?;

        let session = Session {
            page,
            source,
            target,
            waits: self.waits(),
            item_delay: self.config.item_delay(),
            closed: false,
        };

        if let Err(e) = session.prepare(&self.config.page_url, self.config.settle_delay()).await {
            error!("Failed to prepare session for {} -> {}: {}", source, target, e);
            session.close().await;
            return Err(e);
        }

        Ok(session)
    }

    async fn with_session<T, F>(&self, source: Language, target: Language, work: F) -> Result<T>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T>> + Send,
    {
        let mut session = self.open_session(source, target).await?;
        let outcome = work(&mut session).await;
        session.close().await;
        outcome
    }
}

#[async_trait]
impl TranslationEngine for BrowserEngine {
    fn info(&self) -> EngineInfo {
        EngineInfo {
            name: "Browser (WebDriver)",
            requires_webdriver: true,
        }
    }

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<TranslationResult> {
        info!("Translating '{}' from {} to {}", preview(text, 60), source, target);
        let text = text.to_string();
        let translated = self
            .with_session(source, target, move |session| {
                async move { session.translate_text(&text).await }.boxed()
            })
            .await?;

        Ok(TranslationResult::new(translated, source, target))
    }

    async fn translate_many(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<TranslationResult>> {
        let texts = texts.to_vec();
        let translated = self
            .with_session(source, target, move |session| {
                async move {
                    let mut out = Vec::with_capacity(texts.len());
                    for text in &texts {
                        out.push(session.translate_text(text).await?);
                    }
                    Ok::<_, Error>(out)
                }
                .boxed()
            })
            .await?;

        Ok(translated
            .into_iter()
            .map(|text| TranslationResult::new(text, source, target))
            .collect())
    }

    async fn translate_document(&self, doc: Document, source: Language, target: Language) -> Result<Document> {
        self.with_session(source, target, move |session| translate_document_with(doc, session))
            .await
    }
}

/// A browser page set up for one source/target language pair
pub struct Session {
    page: Box<dyn TranslatePage>,
    source: Language,
    target: Language,
    waits: WaitPolicy,
    item_delay: Duration,
    closed: bool,
}

impl Session {
    async fn prepare(&self, page_url: &str, settle_delay: Duration) -> Result<()> {
        self.page.navigate(page_url).await?;

        match self.page.dismiss_consent().await {
            Ok(true) => debug!("Dismissed consent prompt"),
            Ok(false) => {}
            Err(e) => debug!("Consent prompt not dismissed: {}", e),
        }

        self.select_language(PickerSide::Source, self.source).await?;
        // the page re-renders the pickers after a source change
        tokio::time::sleep(settle_delay).await;
        self.select_language(PickerSide::Target, self.target).await
    }

    async fn select_language(&self, side: PickerSide, language: Language) -> Result<()> {
        let page = self.page.as_ref();

        self.waits
            .until(&format!("{} language picker", side.as_str()), move || async move {
                page.open_language_picker(side).await.map(Some)
            })
            .await?;

        let name = language.display_name();
        self.waits
            .until(&format!("'{name}' in the {} language list", side.as_str()), move || async move {
                page.choose_language(name).await.map(|found| found.then_some(()))
            })
            .await?;

        debug!("Selected {} language {}", side.as_str(), name);
        Ok(())
    }

    /// Translate one text on the ready page.
    ///
    /// Failures are logged with the text and language pair and returned as
    /// [`Error::ItemFailed`].
    pub async fn translate_text(&mut self, text: &str) -> Result<String> {
        debug!("Translating '{}' from {} to {}", preview(text, 60), self.source, self.target);

        let mut state = ItemState::Idle;
        let outcome = loop {
            match self.step(state, text).await {
                Ok(ItemState::Extracted(translated)) => break Ok(translated),
                Ok(next) => state = next,
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(translated) => {
                debug!(
                    "Translated '{}' to '{}' from {} to {}",
                    preview(text, 60),
                    preview(&translated, 60),
                    self.source,
                    self.target
                );
                Ok(translated)
            }
            Err(cause) => {
                error!(
                    "An error occurred translating '{}' from {} to {}: {}",
                    preview(text, 60),
                    self.source,
                    self.target,
                    cause
                );
                Err(Error::ItemFailed {
                    text: text.to_string(),
                    from: self.source,
                    to: self.target,
                    cause: Box::new(cause),
                })
            }
        }
    }

    /// Advance one transition of the item state machine.
    pub async fn step(&self, state: ItemState, text: &str) -> Result<ItemState> {
        let page = self.page.as_ref();

        match state {
            ItemState::Idle => {
                page.clear_source().await?;
                // a stale read means the old surface is being torn down; poll again
                self.waits
                    .until("previous translation to clear", move || async move {
                        match page.result_text().await {
                            Ok(None) => Ok(Some(())),
                            Ok(Some(_)) | Err(DomError::StaleElement) => Ok(None),
                            Err(e) => Err(e),
                        }
                    })
                    .await?;
                Ok(ItemState::Cleared)
            }
            ItemState::Cleared => {
                page.type_source(text).await?;
                let read = match self.read_result().await {
                    Err(Error::StaleElement) => {
                        debug!("Result surface went stale, reading again");
                        self.read_result().await
                    }
                    other => other,
                }?;
                Ok(ItemState::Populated(read))
            }
            ItemState::Populated(read) => {
                if read.is_empty() {
                    return Err(Error::Translation("no result element".to_string()));
                }
                Ok(ItemState::Extracted(read))
            }
            extracted @ ItemState::Extracted(_) => Ok(extracted),
        }
    }

    async fn read_result(&self) -> Result<String> {
        let page = self.page.as_ref();
        self.waits
            .until("translation result", move || page.result_text())
            .await
    }

    /// Quit the browser. Failures are logged, never returned.
    pub async fn close(mut self) {
        self.closed = true;
        match self.page.quit().await {
            Ok(()) => info!("Closed browser session for {} -> {}", self.source, self.target),
            Err(e) => warn!(
                "Failed to close browser session for {} -> {}: {}",
                self.source, self.target, e
            ),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "Browser session for {} -> {} dropped without being closed",
                self.source, self.target
            );
        }
    }
}

#[async_trait]
impl LeafTranslator for Session {
    async fn translate_leaf(&mut self, text: &str) -> Result<String> {
        if !self.item_delay.is_zero() {
            tokio::time::sleep(self.item_delay).await;
        }
        self.translate_text(text).await
    }
}
