#![forbid(unsafe_code)]

pub mod active_set;
pub mod model;
pub mod time;
pub mod transition;

pub use active_set::{ResolvedNavigation, resolve};
pub use time::Clock;
pub use transition::{ProgressDecision, apply};
