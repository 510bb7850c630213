//! Which navigation entries to highlight for the page on screen.

use std::collections::BTreeSet;

use crate::model::{DisplayedUnit, LinkCatalog, ModuleId, ProblemId};

/// Highlighted entries plus the displayed module's problem list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNavigation {
    pub active_ids: BTreeSet<ModuleId>,
    /// Problems of the displayed module in catalog order. Always empty for solutions.
    pub problem_ids: Vec<ProblemId>,
}

impl ResolvedNavigation {
    #[must_use]
    pub fn is_active(&self, id: &ModuleId) -> bool {
        self.active_ids.contains(id)
    }
}

/// Resolve the active set for `unit` against `catalog`.
///
/// - A module highlights its own entry (first match on duplicate ids) and lists
///   that entry's problems. An id missing from the catalog yields an empty result.
/// - A solution highlights every entry with at least one problem it documents.
#[must_use]
pub fn resolve(unit: &DisplayedUnit, catalog: &LinkCatalog) -> ResolvedNavigation {
    match unit {
        DisplayedUnit::Module { id } => match catalog.find(id) {
            Some(entry) => ResolvedNavigation {
                active_ids: BTreeSet::from([entry.id.clone()]),
                problem_ids: entry
                    .problems
                    .iter()
                    .map(|problem| problem.unique_id.clone())
                    .collect(),
            },
            None => ResolvedNavigation::default(),
        },
        DisplayedUnit::Solution { id } => ResolvedNavigation {
            active_ids: catalog
                .iter()
                .filter(|entry| entry.problems.iter().any(|p| p.is_solved_by(id)))
                .map(|entry| entry.id.clone())
                .collect(),
            problem_ids: Vec::new(),
        },
    }
}
