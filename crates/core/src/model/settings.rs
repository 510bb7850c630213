use super::toc::FALLBACK_LANGUAGE;

/// Environment variable naming the reader's preferred language.
pub const LANGUAGE_ENV: &str = "GUIDE_LANG";

/// Reader-facing layout configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSettings {
    language: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            language: FALLBACK_LANGUAGE.to_owned(),
        }
    }
}

impl LayoutSettings {
    /// Read settings from `GUIDE_LANG`; unset or blank means `cpp`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_language(std::env::var(LANGUAGE_ENV).unwrap_or_default())
    }

    /// Override the language; blank input keeps the current one.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        let trimmed = language.trim();
        if !trimmed.is_empty() {
            self.language = trimmed.to_owned();
        }
        self
    }

    /// Language used to pick the table of contents.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}
