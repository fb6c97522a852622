//! Session registry: the live booking sessions of this process

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::futures::Notified;
use tokio::sync::{Mutex, MutexGuard, Notify};
use tokio::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{BookingSession, DomainError, DomainResult};

/// One booking session plus the plumbing needed to drive it concurrently.
///
/// The booking record sits behind an async mutex that is never held across
/// a simulated delay. Long-running operations subscribe to `abort` before
/// releasing the lock and give up when it fires.
pub struct SessionHandle {
    id: Uuid,
    state: Mutex<BookingSession>,
    abort: Notify,
    born: Instant,
    /// Millis since `born` of the last access
    last_active: AtomicU64,
}

impl SessionHandle {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: Mutex::new(BookingSession::new(id)),
            abort: Notify::new(),
            born: Instant::now(),
            last_active: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lock the booking record, marking the session as active.
    pub async fn lock(&self) -> MutexGuard<'_, BookingSession> {
        self.touch();
        self.state.lock().await
    }

    /// Future that resolves on the next [`abort_pending`](Self::abort_pending).
    ///
    /// Registration happens on creation, so create it while still holding
    /// the lock to avoid missing an abort.
    pub fn aborted(&self) -> Notified<'_> {
        self.abort.notified()
    }

    /// Wake every operation waiting on [`aborted`](Self::aborted).
    pub fn abort_pending(&self) {
        self.abort.notify_waiters();
    }

    pub fn touch(&self) {
        let elapsed = self.born.elapsed().as_millis() as u64;
        self.last_active.fetch_max(elapsed, Ordering::Relaxed);
    }

    pub fn idle_for(&self) -> Duration {
        let last = self.born + Duration::from_millis(self.last_active.load(Ordering::Relaxed));
        Instant::now().saturating_duration_since(last)
    }
}

/// Thread-safe registry of booking sessions
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<SessionHandle>>,
}

/// Shared, reference-counted session registry
pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared() -> SharedSessionRegistry {
        Arc::new(Self::new())
    }

    /// Open a fresh session in the `Idle` phase.
    pub fn create(&self) -> Arc<SessionHandle> {
        let id = Uuid::new_v4();
        let handle = Arc::new(SessionHandle::new(id));
        self.sessions.insert(id, handle.clone());
        info!(session_id = %id, "Booking session opened");
        handle
    }

    pub fn get(&self, id: Uuid) -> DomainResult<Arc<SessionHandle>> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found("Session", id.to_string()))
    }

    /// Tear down a session, aborting anything still pending on it.
    pub fn remove(&self, id: Uuid) -> DomainResult<()> {
        match self.sessions.remove(&id) {
            Some((_, handle)) => {
                handle.abort_pending();
                info!(session_id = %id, "Booking session closed");
                Ok(())
            }
            None => {
                warn!(session_id = %id, "Attempted to close unknown session");
                Err(DomainError::not_found("Session", id.to_string()))
            }
        }
    }

    /// Drop every session idle for at least `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let stale: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().idle_for() >= max_idle)
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for id in stale {
            // Re-check under the shard lock; the session may have been used since.
            if let Some((_, handle)) = self
                .sessions
                .remove_if(&id, |_, handle| handle.idle_for() >= max_idle)
            {
                handle.abort_pending();
                evicted += 1;
            }
        }
        evicted
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingPhase;

    #[tokio::test]
    async fn create_and_get() {
        let registry = SessionRegistry::new();
        let handle = registry.create();
        let fetched = registry.get(handle.id()).unwrap();
        assert_eq!(fetched.id(), handle.id());
        assert_eq!(fetched.lock().await.phase(), &BookingPhase::Idle);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        let err = registry.get(Uuid::new_v4()).err().unwrap();
        assert!(matches!(err, DomainError::NotFound { entity: "Session", .. }));
        assert!(registry.remove(Uuid::new_v4()).is_err());
    }

    #[tokio::test]
    async fn remove_wakes_pending_waiters() {
        let registry = SessionRegistry::new();
        let handle = registry.create();
        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.aborted().await })
        };
        tokio::task::yield_now().await;

        registry.remove(handle.id()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_only_idle_sessions() {
        let registry = SessionRegistry::new();
        let stale = registry.create();
        let fresh = registry.create();

        tokio::time::advance(Duration::from_secs(50)).await;
        let _ = fresh.lock().await;
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)), 1);
        assert!(registry.get(stale.id()).is_err());
        assert!(registry.get(fresh.id()).is_ok());
    }
}
