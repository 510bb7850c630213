use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::ids::{ModuleId, ProblemId, SolutionId};

/// Errors raised while building a catalog from a content index.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("content index node {index} has no id")]
    MissingId { index: usize },
    #[error("content index is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A practice problem listed on a module, optionally documented by a solution page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRef {
    pub unique_id: ProblemId,
    pub solution_id: Option<SolutionId>,
}

impl ProblemRef {
    /// A problem with no solution page.
    #[must_use]
    pub fn new(unique_id: ProblemId) -> Self {
        Self {
            unique_id,
            solution_id: None,
        }
    }

    /// Attach the solution page documenting this problem.
    #[must_use]
    pub fn with_solution(mut self, solution_id: SolutionId) -> Self {
        self.solution_id = Some(solution_id);
        self
    }

    /// True when `solution_id` documents this problem.
    #[must_use]
    pub fn is_solved_by(&self, solution_id: &SolutionId) -> bool {
        self.solution_id.as_ref() == Some(solution_id)
    }
}

/// One selectable module in the sidebar navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub id: ModuleId,
    pub title: String,
    pub division: Option<String>,
    pub problems: Vec<ProblemRef>,
}

impl NavigationEntry {
    /// Entry titled after its id, with no division.
    #[must_use]
    pub fn new(id: ModuleId, problems: Vec<ProblemRef>) -> Self {
        Self {
            title: id.as_str().to_owned(),
            id,
            division: None,
            problems,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Ordered navigation entries, in the content index's declared order.
///
/// Duplicate ids are kept as-is; lookups prefer the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkCatalog {
    entries: Vec<NavigationEntry>,
}

impl LinkCatalog {
    #[must_use]
    pub fn new(entries: Vec<NavigationEntry>) -> Self {
        Self { entries }
    }

    /// Build the catalog from a content index document.
    ///
    /// Only nodes that belong to a division become navigation entries; solution
    /// pages and other content in the index are skipped.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::MissingId` for a module node with a blank id.
    pub fn from_content_index(json: &str) -> Result<Self, CatalogError> {
        let index: ContentIndex = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(index.edges.len());

        for (position, edge) in index.edges.into_iter().enumerate() {
            let node = edge.node;
            let Some(division) = node.fields.and_then(|f| f.division) else {
                continue;
            };
            let id = node.frontmatter.id.trim();
            if id.is_empty() {
                return Err(CatalogError::MissingId { index: position });
            }

            let problems = node
                .problems
                .unwrap_or_default()
                .into_iter()
                .map(|p| ProblemRef {
                    unique_id: ProblemId::new(p.unique_id),
                    solution_id: p
                        .sol_id
                        .filter(|s| !s.trim().is_empty())
                        .map(SolutionId::new),
                })
                .collect();

            let title = node
                .frontmatter
                .title
                .unwrap_or_else(|| id.to_owned());

            entries.push(NavigationEntry {
                id: ModuleId::new(id),
                title,
                division: Some(division),
                problems,
            });
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    /// First entry with the given id.
    #[must_use]
    pub fn find(&self, id: &ModuleId) -> Option<&NavigationEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Map every problem to the module that lists it first.
    #[must_use]
    pub fn problem_owners(&self) -> HashMap<ProblemId, ModuleId> {
        let mut owners: HashMap<ProblemId, ModuleId> = HashMap::new();
        for entry in &self.entries {
            for problem in &entry.problems {
                owners
                    .entry(problem.unique_id.clone())
                    .or_insert_with(|| entry.id.clone());
            }
        }
        owners
    }
}

impl<'a> IntoIterator for &'a LinkCatalog {
    type Item = &'a NavigationEntry;
    type IntoIter = std::slice::Iter<'a, NavigationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ─── Content index wire shape ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct ContentIndex {
    #[serde(default)]
    edges: Vec<IndexEdge>,
}

#[derive(Deserialize)]
struct IndexEdge {
    node: IndexNode,
}

#[derive(Deserialize)]
struct IndexNode {
    frontmatter: IndexFrontmatter,
    fields: Option<IndexFields>,
    problems: Option<Vec<IndexProblem>>,
}

#[derive(Deserialize)]
struct IndexFrontmatter {
    #[serde(default)]
    id: String,
    title: Option<String>,
}

#[derive(Deserialize)]
struct IndexFields {
    division: Option<String>,
}

#[derive(Deserialize)]
struct IndexProblem {
    #[serde(rename = "uniqueID")]
    unique_id: String,
    #[serde(rename = "solID")]
    sol_id: Option<String>,
}
