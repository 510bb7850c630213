mod ids;
mod navigation;
mod progress;
mod settings;
mod toc;
mod unit;

pub use ids::{ModuleId, ParseIdError, ProblemId, SolutionId, UserId};
pub use navigation::{CatalogError, LinkCatalog, NavigationEntry, ProblemRef};
pub use progress::{ProgressParseError, ProgressState};
pub use settings::{LANGUAGE_ENV, LayoutSettings};
pub use toc::{FALLBACK_LANGUAGE, TableOfContents, TocHeading};
pub use unit::DisplayedUnit;
