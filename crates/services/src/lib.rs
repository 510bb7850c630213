#![forbid(unsafe_code)]

pub mod app_services;
pub mod celebration;
pub mod error;
pub mod layout;
pub mod progress_service;

pub use guide_core::Clock;

pub use app_services::AppServices;
pub use celebration::{Celebration, CelebrationCounter};
pub use error::{AppServicesError, LayoutError, ProgressLoadError, ProgressPersistenceError};
pub use layout::{LayoutContext, LayoutService};
pub use progress_service::{ProgressHandle, ProgressService};
