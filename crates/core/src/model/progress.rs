use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A reader's completion status for one content page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressState {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Practicing,
    Complete,
}

impl ProgressState {
    /// Every state, from least to most progressed.
    pub const ALL: [ProgressState; 3] = [Self::NotStarted, Self::Practicing, Self::Complete];

    /// Human-readable label, also used as the stored form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Practicing => "Practicing",
            Self::Complete => "Complete",
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label names no known progress state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown progress state: {0}")]
pub struct ProgressParseError(pub String);

impl FromStr for ProgressState {
    type Err = ProgressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.label() == s.trim())
            .ok_or_else(|| ProgressParseError(s.to_owned()))
    }
}
