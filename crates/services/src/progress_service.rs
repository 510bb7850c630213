use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use guide_core::model::{DisplayedUnit, ProgressState, UserId};
use guide_core::transition::{self, ProgressDecision};
use storage::repository::{ProgressRecord, ProgressRepository};

use crate::Clock;
use crate::celebration::Celebration;
use crate::error::{ProgressLoadError, ProgressPersistenceError};

type HandleKey = (UserId, String);

/// Hands out one progress handle per (reader, page) so every change to a page
/// goes through the same ordered lock.
///
/// Handles are held weakly; once every context for a page is dropped the
/// handle is released and its map slot is pruned on a later `open`.
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
    celebration: Arc<dyn Celebration>,
    handles: Mutex<HashMap<HandleKey, Weak<ProgressHandle>>>,
}

impl ProgressService {
    /// Create a service writing through `repo` and celebrating via `celebration`.
    #[must_use]
    pub fn new(
        clock: Clock,
        repo: Arc<dyn ProgressRepository>,
        celebration: Arc<dyn Celebration>,
    ) -> Self {
        Self {
            clock,
            repo,
            celebration,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Open the progress handle for `unit`, reusing a live one if present.
    ///
    /// The store is read on every call and the handle's state replaced with
    /// it, so changes made elsewhere show up on the next render. A page with
    /// no stored progress reads as `NotStarted`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressLoadError` if the stored progress cannot be read.
    pub async fn open(
        &self,
        user_id: UserId,
        unit: &DisplayedUnit,
    ) -> Result<Arc<ProgressHandle>, ProgressLoadError> {
        let handle = {
            let mut handles = self.handles.lock().await;
            handles.retain(|_, weak| weak.strong_count() > 0);

            let key = (user_id, unit.key().to_owned());
            if let Some(existing) = handles.get(&key).and_then(Weak::upgrade) {
                existing
            } else {
                let handle = Arc::new(ProgressHandle {
                    user_id,
                    unit_key: key.1.clone(),
                    clock: self.clock,
                    repo: Arc::clone(&self.repo),
                    celebration: Arc::clone(&self.celebration),
                    state: Mutex::new(ProgressState::default()),
                });
                handles.insert(key, Arc::downgrade(&handle));
                handle
            }
        };

        let current = handle.reload().await?;
        debug!(unit = unit.key(), %current, "opened progress handle");
        Ok(handle)
    }
}

/// Progress of one reader on one page, plus the means to change it.
pub struct ProgressHandle {
    user_id: UserId,
    unit_key: String,
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
    celebration: Arc<dyn Celebration>,
    state: Mutex<ProgressState>,
}

impl ProgressHandle {
    /// Latest progress known to this handle.
    pub async fn current(&self) -> ProgressState {
        *self.state.lock().await
    }

    /// Re-read the stored progress into this handle.
    ///
    /// Runs under the handle's lock, so it never interleaves with a change.
    async fn reload(&self) -> Result<ProgressState, ProgressLoadError> {
        let mut current = self.state.lock().await;
        let stored = self
            .repo
            .get_progress(self.user_id, &self.unit_key)
            .await
            .map_err(|source| ProgressLoadError {
                unit_key: self.unit_key.clone(),
                source,
            })?
            .map(|record| record.state)
            .unwrap_or_default();

        if *current != stored {
            let previous = *current;
            debug!(unit = %self.unit_key, from = %previous, to = %stored, "progress reloaded from store");
            *current = stored;
        }
        Ok(stored)
    }

    /// Apply a requested progress change.
    ///
    /// Requests are applied one at a time in arrival order, each against the
    /// state left by the previous one. The store is written before local state
    /// changes; the celebration fires only after a successful write.
    ///
    /// # Errors
    ///
    /// Returns `ProgressPersistenceError` if the store rejects the write. Local
    /// state is unchanged in that case.
    pub async fn request_change(
        &self,
        requested: ProgressState,
    ) -> Result<ProgressDecision, ProgressPersistenceError> {
        let mut current = self.state.lock().await;
        let decision = transition::apply(*current, requested);
        if decision.is_noop(*current) {
            debug!(unit = %self.unit_key, state = %requested, "progress unchanged");
            return Ok(decision);
        }

        let record = ProgressRecord::new(
            self.user_id,
            self.unit_key.clone(),
            decision.next,
            self.clock.now(),
        );
        if let Err(source) = self.repo.upsert_progress(&record).await {
            warn!(unit = %self.unit_key, error = %source, "failed to persist progress");
            return Err(ProgressPersistenceError {
                unit_key: self.unit_key.clone(),
                source,
            });
        }

        let previous = *current;
        info!(
            unit = %self.unit_key,
            from = %previous,
            to = %decision.next,
            celebrate = decision.should_celebrate,
            "progress updated"
        );
        *current = decision.next;
        if decision.should_celebrate {
            self.celebration.celebrate();
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celebration::CelebrationCounter;
    use guide_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service() -> (ProgressService, Arc<InMemoryRepository>, Arc<CelebrationCounter>) {
        let repo = Arc::new(InMemoryRepository::new());
        let counter = Arc::new(CelebrationCounter::new());
        let service = ProgressService::new(fixed_clock(), repo.clone(), counter.clone());
        (service, repo, counter)
    }

    #[tokio::test]
    async fn new_page_starts_not_started() {
        let (service, _, _) = service();
        let handle = service
            .open(UserId::random(), &DisplayedUnit::module("dp"))
            .await
            .unwrap();
        assert_eq!(handle.current().await, ProgressState::NotStarted);
    }

    #[tokio::test]
    async fn stored_progress_is_loaded() {
        let (service, repo, _) = service();
        let user = UserId::random();
        repo.upsert_progress(&ProgressRecord::new(
            user,
            "dp",
            ProgressState::Complete,
            fixed_clock().now(),
        ))
        .await
        .unwrap();

        let handle = service.open(user, &DisplayedUnit::module("dp")).await.unwrap();
        assert_eq!(handle.current().await, ProgressState::Complete);
    }

    #[tokio::test]
    async fn change_persists_and_celebrates() {
        let (service, repo, counter) = service();
        let user = UserId::random();
        let handle = service.open(user, &DisplayedUnit::module("dp")).await.unwrap();

        let decision = handle.request_change(ProgressState::Practicing).await.unwrap();
        assert_eq!(decision.next, ProgressState::Practicing);
        assert!(decision.should_celebrate);
        assert_eq!(counter.count(), 1);

        let stored = repo.get_progress(user, "dp").await.unwrap().unwrap();
        assert_eq!(stored.state, ProgressState::Practicing);
        assert_eq!(stored.updated_at, fixed_clock().now());
    }

    #[tokio::test]
    async fn repeated_request_is_idempotent() {
        let (service, _, counter) = service();
        let handle = service
            .open(UserId::random(), &DisplayedUnit::module("dp"))
            .await
            .unwrap();

        handle.request_change(ProgressState::Complete).await.unwrap();
        let again = handle.request_change(ProgressState::Complete).await.unwrap();
        assert!(!again.should_celebrate);
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn same_page_shares_one_handle() {
        let (service, _, _) = service();
        let user = UserId::random();
        let unit = DisplayedUnit::solution("sol1");
        let first = service.open(user, &unit).await.unwrap();
        let second = service.open(user, &unit).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        first.request_change(ProgressState::Practicing).await.unwrap();
        assert_eq!(second.current().await, ProgressState::Practicing);
    }

    #[tokio::test]
    async fn reopening_picks_up_store_changes() {
        let (service, repo, counter) = service();
        let user = UserId::random();
        let unit = DisplayedUnit::module("dp");
        let held = service.open(user, &unit).await.unwrap();

        repo.upsert_progress(&ProgressRecord::new(
            user,
            "dp",
            ProgressState::Complete,
            fixed_clock().now(),
        ))
        .await
        .unwrap();

        let reopened = service.open(user, &unit).await.unwrap();
        assert!(Arc::ptr_eq(&held, &reopened));
        assert_eq!(held.current().await, ProgressState::Complete);

        let decision = reopened.request_change(ProgressState::Practicing).await.unwrap();
        assert!(!decision.should_celebrate);
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn dropped_handles_are_released() {
        let (service, _, _) = service();
        let user = UserId::random();

        let first = service.open(user, &DisplayedUnit::module("a")).await.unwrap();
        let weak = Arc::downgrade(&first);
        drop(first);
        assert!(weak.upgrade().is_none());

        let _second = service.open(user, &DisplayedUnit::module("b")).await.unwrap();
        let handles = service.handles.lock().await;
        assert_eq!(handles.len(), 1);
        assert!(handles.contains_key(&(user, "b".to_owned())));
    }
}
