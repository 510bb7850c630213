use std::sync::atomic::{AtomicUsize, Ordering};

/// One-shot celebratory effect (confetti) fired after a progress change.
pub trait Celebration: Send + Sync {
    /// Fire the effect once.
    fn celebrate(&self);
}

/// Counts how many times the effect was triggered.
#[derive(Debug, Default)]
pub struct CelebrationCounter {
    fired: AtomicUsize,
}

impl CelebrationCounter {
    /// Creates a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of celebrations fired so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fired.load(Ordering::Acquire)
    }
}

impl Celebration for CelebrationCounter {
    fn celebrate(&self) {
        self.fired.fetch_add(1, Ordering::AcqRel);
    }
}
