use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDateTime, Utc};
use tokio::sync::{Mutex as SessionLock, OwnedMutexGuard};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Session, SessionView};

/// Live widget sessions.
///
/// Each session sits behind its own async lock, held for the whole handling
/// of an event, upstream call included. Events for one visitor are therefore
/// applied in order, while different visitors never wait on each other.
/// Reads go through [`SessionStore::snapshot`], which returns the view
/// published when the last event finished and never waits on that lock.
pub struct SessionStore {
    ttl_minutes: i64,
    sessions: Mutex<HashMap<Uuid, Arc<Entry>>>,
}

struct Entry {
    session: Arc<SessionLock<Session>>,
    published: Mutex<Published>,
}

struct Published {
    view: SessionView,
    expires_at: NaiveDateTime,
}

impl Published {
    fn of(session: &Session) -> Self {
        Self {
            view: session.view(),
            expires_at: session.expires_at,
        }
    }
}

impl Entry {
    fn published(&self) -> MutexGuard<'_, Published> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to one session. The view seen by readers is refreshed
/// when the guard is dropped.
pub struct SessionGuard {
    session: OwnedMutexGuard<Session>,
    entry: Arc<Entry>,
}

impl Deref for SessionGuard {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.session
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("session", &*self.session)
            .finish()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        *self.entry.published() = Published::of(&self.session);
    }
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl_minutes,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    fn map(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<Entry>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, id: Uuid) -> Result<Arc<Entry>, AppError> {
        self.map()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
    }

    pub fn create(&self, user_id: String) -> Session {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired widget sessions");
        }

        let session = Session::new(user_id, self.ttl_minutes);
        let entry = Entry {
            published: Mutex::new(Published::of(&session)),
            session: Arc::new(SessionLock::new(session.clone())),
        };
        self.map().insert(session.id, Arc::new(entry));
        session
    }

    /// Waits for exclusive access to a live session.
    pub async fn lock(&self, id: Uuid) -> Result<SessionGuard, AppError> {
        let entry = self.entry(id)?;
        let session = Arc::clone(&entry.session).lock_owned().await;
        if session.is_expired(Utc::now().naive_utc()) {
            drop(session);
            self.remove(id);
            return Err(AppError::SessionNotFound(id.to_string()));
        }
        Ok(SessionGuard { session, entry })
    }

    /// Last published view of a live session.
    pub fn snapshot(&self, id: Uuid) -> Result<SessionView, AppError> {
        let entry = self.entry(id)?;
        let published = entry.published();
        if published.expires_at <= Utc::now().naive_utc() {
            drop(published);
            self.remove(id);
            return Err(AppError::SessionNotFound(id.to_string()));
        }
        Ok(published.view.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.map().remove(&id).is_some()
    }

    /// Sessions busy with an event are left alone.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().naive_utc();
        let mut map = self.map();
        let before = map.len();
        map.retain(|_, entry| match entry.session.try_lock() {
            Ok(s) => !s.is_expired(now),
            Err(_) => true,
        });
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lock() {
        let store = SessionStore::new(30);
        let session = store.create("visitor-1".to_string());
        let guard = store.lock(session.id).await.unwrap();
        assert_eq!(guard.user_id, "visitor-1");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new(30);
        let err = store.lock(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = SessionStore::new(0);
        let session = store.create("visitor-1".to_string());
        let err = store.lock(session.id).await.unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_purges_expired() {
        let store = SessionStore::new(0);
        store.create("a".to_string());
        store.create("b".to_string());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_does_not_wait_for_event() {
        let store = SessionStore::new(30);
        let session = store.create("a".to_string());

        let mut guard = store.lock(session.id).await.unwrap();
        guard.wizard.minimized = true;
        assert!(!store.snapshot(session.id).unwrap().minimized);

        drop(guard);
        assert!(store.snapshot(session.id).unwrap().minimized);
    }

    #[tokio::test]
    async fn test_snapshot_of_expired_session() {
        let store = SessionStore::new(0);
        let session = store.create("a".to_string());
        let err = store.snapshot(session.id).unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new(30);
        let session = store.create("a".to_string());
        assert!(store.remove(session.id));
        assert!(!store.remove(session.id));
    }
}
