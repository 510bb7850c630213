use serde::{Deserialize, Serialize};

use super::ids::{ModuleId, SolutionId};

/// The content page currently on screen.
///
/// Deserializing an unknown `kind` fails; the page type is decided by the
/// host at render time, never guessed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayedUnit {
    Module { id: ModuleId },
    Solution { id: SolutionId },
}

impl DisplayedUnit {
    #[must_use]
    pub fn module(id: impl Into<String>) -> Self {
        Self::Module {
            id: ModuleId::new(id),
        }
    }

    #[must_use]
    pub fn solution(id: impl Into<String>) -> Self {
        Self::Solution {
            id: SolutionId::new(id),
        }
    }

    /// Id under which the reader's progress on this page is stored.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Module { id } => id.as_str(),
            Self::Solution { id } => id.as_str(),
        }
    }
}
