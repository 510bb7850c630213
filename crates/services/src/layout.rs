//! Navigation state and progress wiring handed to the content page chrome.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use guide_core::active_set::{self, ResolvedNavigation};
use guide_core::model::{
    DisplayedUnit, LayoutSettings, LinkCatalog, ModuleId, ProblemId, ProgressState,
    TableOfContents, TocHeading, UserId,
};
use guide_core::transition::ProgressDecision;

use crate::error::{LayoutError, ProgressPersistenceError};
use crate::progress_service::{ProgressHandle, ProgressService};

/// Builds a `LayoutContext` for each rendered page.
pub struct LayoutService {
    settings: LayoutSettings,
    catalog: Arc<LinkCatalog>,
    owners: Arc<HashMap<ProblemId, ModuleId>>,
    progress: Arc<ProgressService>,
}

impl LayoutService {
    /// Creates a service over `catalog`, indexing problem owners once.
    #[must_use]
    pub fn new(
        settings: LayoutSettings,
        catalog: Arc<LinkCatalog>,
        progress: Arc<ProgressService>,
    ) -> Self {
        let owners = Arc::new(catalog.problem_owners());
        Self {
            settings,
            catalog,
            owners,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<LinkCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Swap in a catalog rebuilt from a changed content index.
    pub fn replace_catalog(&mut self, catalog: Arc<LinkCatalog>) {
        if Arc::ptr_eq(&self.catalog, &catalog) {
            return;
        }
        debug!(entries = catalog.len(), "navigation catalog replaced");
        self.owners = Arc::new(catalog.problem_owners());
        self.catalog = catalog;
    }

    /// Resolve navigation and progress for the page `unit` shown to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::Load` if the reader's stored progress cannot be read.
    pub async fn build_context(
        &self,
        user_id: UserId,
        unit: DisplayedUnit,
        toc: &TableOfContents,
    ) -> Result<LayoutContext, LayoutError> {
        let resolved = active_set::resolve(&unit, &self.catalog);
        if resolved.active_ids.is_empty() {
            match &unit {
                DisplayedUnit::Module { id } => {
                    warn!(module = %id, "module has no navigation entry");
                }
                DisplayedUnit::Solution { id } => {
                    debug!(solution = %id, "solution is not referenced by any module");
                }
            }
        }

        let progress = self.progress.open(user_id, &unit).await?;
        let current_progress = progress.current().await;
        let table_of_contents = toc.for_language(self.settings.language()).to_vec();

        debug!(
            unit = unit.key(),
            active = resolved.active_ids.len(),
            problems = resolved.problem_ids.len(),
            "layout context built"
        );

        Ok(LayoutContext {
            unit,
            catalog: Arc::clone(&self.catalog),
            owners: Arc::clone(&self.owners),
            resolved,
            table_of_contents,
            current_progress,
            progress,
        })
    }
}

/// Read-only snapshot shared with the page's presentational components.
///
/// `request_progress_change` is the only way to mutate anything; the
/// `current_progress` value reflects the state when the snapshot was taken.
#[derive(Clone)]
pub struct LayoutContext {
    unit: DisplayedUnit,
    catalog: Arc<LinkCatalog>,
    owners: Arc<HashMap<ProblemId, ModuleId>>,
    resolved: ResolvedNavigation,
    table_of_contents: Vec<TocHeading>,
    current_progress: ProgressState,
    progress: Arc<ProgressHandle>,
}

impl LayoutContext {
    #[must_use]
    pub fn displayed_unit(&self) -> &DisplayedUnit {
        &self.unit
    }

    #[must_use]
    pub fn navigation_catalog(&self) -> &LinkCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn active_ids(&self) -> &BTreeSet<ModuleId> {
        &self.resolved.active_ids
    }

    #[must_use]
    pub fn is_active(&self, id: &ModuleId) -> bool {
        self.resolved.is_active(id)
    }

    #[must_use]
    pub fn problem_ids(&self) -> &[ProblemId] {
        &self.resolved.problem_ids
    }

    /// Module that first lists `problem`, if any.
    #[must_use]
    pub fn owning_module(&self, problem: &ProblemId) -> Option<&ModuleId> {
        self.owners.get(problem)
    }

    #[must_use]
    pub fn table_of_contents(&self) -> &[TocHeading] {
        &self.table_of_contents
    }

    #[must_use]
    pub fn current_progress(&self) -> ProgressState {
        self.current_progress
    }

    /// Ask for the displayed page's progress to become `requested`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressPersistenceError` if the change could not be stored.
    pub async fn request_progress_change(
        &self,
        requested: ProgressState,
    ) -> Result<ProgressDecision, ProgressPersistenceError> {
        self.progress.request_change(requested).await
    }
}
