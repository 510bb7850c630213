//! Decides how a requested progress change applies and whether to celebrate.

use crate::model::ProgressState;

/// Outcome of a requested progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressDecision {
    pub next: ProgressState,
    pub should_celebrate: bool,
}

impl ProgressDecision {
    /// True when applying this decision leaves `current` untouched.
    #[must_use]
    pub fn is_noop(&self, current: ProgressState) -> bool {
        self.next == current
    }
}

/// Apply `requested` on top of `current`.
///
/// Celebrates when moving into `Practicing` or `Complete` from anything other
/// than `Complete`. Re-requesting the current state does nothing.
#[must_use]
pub fn apply(current: ProgressState, requested: ProgressState) -> ProgressDecision {
    if requested == current {
        return ProgressDecision {
            next: current,
            should_celebrate: false,
        };
    }

    let should_celebrate = current != ProgressState::Complete
        && matches!(
            requested,
            ProgressState::Practicing | ProgressState::Complete
        );

    ProgressDecision {
        next: requested,
        should_celebrate,
    }
}
