use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the translator knows how to address.
///
/// Each variant maps to the label shown by the translation web page
/// ([`Language::display_name`]) and to its ISO 639-1 code
/// ([`Language::iso_code`]), which names output files and is what HTTP APIs
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    English,
    Japanese,
    Portuguese,
    French,
    ChineseSimplified,
    German,
    Russian,
    Spanish,
    Vietnamese,
    Thai,
}

impl Language {
    /// Every language, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::English,
        Self::Japanese,
        Self::Portuguese,
        Self::French,
        Self::ChineseSimplified,
        Self::German,
        Self::Russian,
        Self::Spanish,
        Self::Vietnamese,
        Self::Thai,
    ];

    /// Variant identifier, e.g. `ChineseSimplified`.
    pub const fn ident(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Japanese => "Japanese",
            Self::Portuguese => "Portuguese",
            Self::French => "French",
            Self::ChineseSimplified => "ChineseSimplified",
            Self::German => "German",
            Self::Russian => "Russian",
            Self::Spanish => "Spanish",
            Self::Vietnamese => "Vietnamese",
            Self::Thai => "Thai",
        }
    }

    /// Label used by the translation page's language pickers.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ChineseSimplified => "Chinese (Simplified)",
            other => other.ident(),
        }
    }

    /// ISO 639-1 code
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
            Self::Portuguese => "pt",
            Self::French => "fr",
            Self::ChineseSimplified => "zh",
            Self::German => "de",
            Self::Russian => "ru",
            Self::Spanish => "es",
            Self::Vietnamese => "vi",
            Self::Thai => "th",
        }
    }

    /// Match a language by name, ignoring case.
    ///
    /// Accepts the variant identifier or the display name. Used to map
    /// language names reported by remote services onto this closed set.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.ident().eq_ignore_ascii_case(name) || lang.display_name().eq_ignore_ascii_case(name)
        })
    }

    /// Match a language by its ISO 639-1 code, ignoring case.
    pub fn from_iso_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.iso_code().eq_ignore_ascii_case(code))
    }

    /// Every language except `source`, in declaration order.
    pub fn all_except(source: Self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|lang| *lang != source).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a string names none of the known languages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}' (expected a name like 'French' or a code like 'fr')")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_iso_code(s))
            .ok_or_else(|| ParseLanguageError(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = ParseLanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.ident().to_string()
    }
}
