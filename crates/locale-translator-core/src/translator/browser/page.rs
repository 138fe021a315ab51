use async_trait::async_trait;
use thiserror::Error;

use crate::error::{Error, Result};

/// Failures of a single DOM interaction.
///
/// Polling waits treat [`DomError::NoSuchElement`] as "not there yet";
/// [`DomError::StaleElement`] surfaces so the caller can decide to re-read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("no such element")]
    NoSuchElement,

    #[error("stale element reference")]
    StaleElement,

    #[error("{0}")]
    Driver(String),
}

pub type DomResult<T> = std::result::Result<T, DomError>;

impl From<DomError> for Error {
    fn from(err: DomError) -> Self {
        match err {
            DomError::StaleElement => Self::StaleElement,
            DomError::NoSuchElement => Self::Browser("no such element".to_string()),
            DomError::Driver(msg) => Self::Browser(msg),
        }
    }
}

/// Which language picker to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSide {
    Source,
    Target,
}

impl PickerSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// The handful of interactions the engine needs from the translation page.
///
/// Every method performs one round of lookups against the current DOM and
/// returns immediately; waiting and retrying is the engine's job.
#[async_trait]
pub trait TranslatePage: Send + Sync {
    async fn navigate(&self, url: &str) -> DomResult<()>;

    /// Click the cookie/data consent button if it is shown. Returns whether it was.
    async fn dismiss_consent(&self) -> DomResult<bool>;

    /// Click the "more languages" control for one side.
    async fn open_language_picker(&self, side: PickerSide) -> DomResult<()>;

    /// Click the visible, coded option labelled `display_name`.
    /// Returns `false` when no such option is currently shown.
    async fn choose_language(&self, display_name: &str) -> DomResult<bool>;

    /// Select all and delete in the source input.
    async fn clear_source(&self) -> DomResult<()>;

    async fn type_source(&self, text: &str) -> DomResult<()>;

    /// Text of the first result surface with non-empty result data, if any.
    async fn result_text(&self) -> DomResult<Option<String>>;

    /// End the browser session.
    async fn quit(&self) -> DomResult<()>;
}

/// Starts fresh browser pages, one per session
#[async_trait]
pub trait PageLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn TranslatePage>>;
}
