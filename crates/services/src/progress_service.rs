use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::{SessionId, SessionProgress, Subject};
use storage::repository::ProgressRepository;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::Clock;
use crate::error::ProgressError;

//
// ─── PER-SESSION LOCKS ─────────────────────────────────────────────────────────
//

/// One async lock per active session key.
///
/// Entries are removed as soon as nobody holds or waits on them.
#[derive(Default)]
struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>,
}

struct SessionLockGuard<'a> {
    locks: &'a SessionLocks,
    session_id: SessionId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SessionLocks {
    async fn acquire(&self, session_id: &SessionId) -> SessionLockGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(session_id.clone()).or_default())
        };
        let guard = lock.lock_owned().await;
        SessionLockGuard {
            locks: self,
            session_id: session_id.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for SessionLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if map
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.session_id);
        }
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Tracks per-session scores and streaks.
///
/// Updates for one session are applied one at a time; different sessions
/// never wait on each other.
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    locks: SessionLocks,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            progress,
            locks: SessionLocks::default(),
        }
    }

    /// Return stored progress, creating and persisting a zeroed record on first access.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn get_or_create(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionProgress, ProgressError> {
        let _lock = self.locks.acquire(session_id).await;
        self.load_or_create(session_id).await
    }

    /// Apply one graded answer to the session and persist it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if loading or saving fails.
    pub async fn record_answer(
        &self,
        session_id: &SessionId,
        subject: Subject,
        correct: bool,
    ) -> Result<SessionProgress, ProgressError> {
        let _lock = self.locks.acquire(session_id).await;

        let mut progress = match self.progress.get_progress(session_id).await? {
            Some(progress) => progress,
            None => SessionProgress::new(session_id.clone(), self.clock.now()),
        };
        progress.record(subject, correct, self.clock.now());
        self.progress.upsert_progress(&progress).await?;
        Ok(progress)
    }

    async fn load_or_create(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionProgress, ProgressError> {
        if let Some(progress) = self.progress.get_progress(session_id).await? {
            return Ok(progress);
        }

        let progress = SessionProgress::new(session_id.clone(), self.clock.now());
        self.progress.upsert_progress(&progress).await?;
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn service(repo: &InMemoryRepository) -> ProgressService {
        ProgressService::new(fixed_clock(), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn unknown_session_gets_zeroed_persisted_record() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let session = SessionId::new("new-learner");

        let progress = service.get_or_create(&session).await.unwrap();
        assert_eq!(progress.problems_solved(), 0);
        assert_eq!(progress.math_score(), 0);
        assert_eq!(progress.last_activity(), fixed_now());

        let again = service.get_or_create(&session).await.unwrap();
        assert_eq!(again.id(), progress.id());
        assert!(repo.get_progress(&session).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn n_correct_then_one_wrong() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let session = SessionId::new("s");

        for _ in 0..5 {
            service.record_answer(&session, Subject::Math, true).await.unwrap();
        }
        let progress = service.get_or_create(&session).await.unwrap();
        assert_eq!(progress.math_score(), 5);
        assert_eq!(progress.math_streak(), 5);

        let progress = service
            .record_answer(&session, Subject::Math, false)
            .await
            .unwrap();
        assert_eq!(progress.math_score(), 5);
        assert_eq!(progress.math_streak(), 0);
        assert_eq!(progress.problems_solved(), 6);
    }

    #[tokio::test]
    async fn record_keeps_id_of_record_created_by_query() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let session = SessionId::new("s");

        let created = service.get_or_create(&session).await.unwrap();
        let updated = service
            .record_answer(&session, Subject::English, true)
            .await
            .unwrap();
        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.english_streak(), 1);
    }

    #[tokio::test]
    async fn concurrent_updates_for_one_session_are_not_lost() {
        let repo = InMemoryRepository::new();
        let service = Arc::new(service(&repo));
        let session = SessionId::new("busy");

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = Arc::clone(&service);
                let session = session.clone();
                let subject = if i % 2 == 0 {
                    Subject::Math
                } else {
                    Subject::English
                };
                tokio::spawn(async move {
                    service.record_answer(&session, subject, true).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let progress = service.get_or_create(&session).await.unwrap();
        assert_eq!(progress.problems_solved(), 50);
        assert_eq!(progress.math_score(), 25);
        assert_eq!(progress.english_score(), 25);
        assert_eq!(service.locks.len(), 0);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let a = SessionId::new("a");
        let b = SessionId::new("b");

        service.record_answer(&a, Subject::Math, true).await.unwrap();
        service.record_answer(&b, Subject::Math, false).await.unwrap();

        assert_eq!(service.get_or_create(&a).await.unwrap().math_streak(), 1);
        assert_eq!(service.get_or_create(&b).await.unwrap().math_streak(), 0);
    }
}
