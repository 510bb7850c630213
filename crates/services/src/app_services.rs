use std::sync::Arc;

use guide_core::model::{LayoutSettings, LinkCatalog};
use storage::repository::Storage;

use crate::Clock;
use crate::celebration::Celebration;
use crate::error::AppServicesError;
use crate::layout::LayoutService;
use crate::progress_service::ProgressService;

/// Assembles the layout and progress services for a host page.
pub struct AppServices {
    layout: LayoutService,
}

impl AppServices {
    /// Wire progress and layout services over `storage`.
    #[must_use]
    pub fn new(
        storage: &Storage,
        clock: Clock,
        settings: LayoutSettings,
        catalog: LinkCatalog,
        celebration: Arc<dyn Celebration>,
    ) -> Self {
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            celebration,
        ));
        let layout = LayoutService::new(settings, Arc::new(catalog), progress);
        Self { layout }
    }

    /// Build services from a content index document, reading settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the content index cannot be parsed.
    pub fn from_content_index(
        storage: &Storage,
        clock: Clock,
        content_index: &str,
        celebration: Arc<dyn Celebration>,
    ) -> Result<Self, AppServicesError> {
        let catalog = LinkCatalog::from_content_index(content_index)?;
        Ok(Self::new(
            storage,
            clock,
            LayoutSettings::from_env(),
            catalog,
            celebration,
        ))
    }

    /// Rebuild the navigation catalog after the content index changed.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the content index cannot be parsed;
    /// the previous catalog stays in place.
    pub fn reload_content_index(&mut self, content_index: &str) -> Result<(), AppServicesError> {
        let catalog = LinkCatalog::from_content_index(content_index)?;
        self.layout.replace_catalog(Arc::new(catalog));
        Ok(())
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutService {
        &self.layout
    }
}
