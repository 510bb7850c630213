//! Shared error types for the services crate.

use thiserror::Error;

use guide_core::model::CatalogError;
use storage::repository::StorageError;

/// A progress change could not be written to the progress store.
///
/// The local progress state is left as it was and no celebration fires.
#[derive(Debug, Error)]
#[error("failed to persist progress for `{unit_key}`")]
pub struct ProgressPersistenceError {
    pub unit_key: String,
    #[source]
    pub source: StorageError,
}

/// Stored progress for a page could not be read.
#[derive(Debug, Error)]
#[error("failed to load progress for `{unit_key}`")]
pub struct ProgressLoadError {
    pub unit_key: String,
    #[source]
    pub source: StorageError,
}

/// Errors emitted while assembling a layout context.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayoutError {
    #[error(transparent)]
    Load(#[from] ProgressLoadError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
