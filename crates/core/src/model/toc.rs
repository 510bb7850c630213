use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Language whose headings are shown when the reader's language has none.
pub const FALLBACK_LANGUAGE: &str = "cpp";

/// One heading of a page, as produced by the content pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocHeading {
    pub depth: u8,
    pub value: String,
    pub slug: String,
}

/// Already-resolved heading lists, one per programming language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableOfContents {
    by_language: HashMap<String, Vec<TocHeading>>,
}

impl TableOfContents {
    /// Wrap headings already grouped by language.
    #[must_use]
    pub fn new(by_language: HashMap<String, Vec<TocHeading>>) -> Self {
        Self { by_language }
    }

    /// Add or replace the headings for `language`.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>, headings: Vec<TocHeading>) -> Self {
        self.by_language.insert(language.into(), headings);
        self
    }

    /// Headings for `language`, falling back to the `cpp` list.
    #[must_use]
    pub fn for_language(&self, language: &str) -> &[TocHeading] {
        self.by_language
            .get(language)
            .or_else(|| self.by_language.get(FALLBACK_LANGUAGE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
