//! Per-session context.
//!
//! Each browser session owns exactly one `Portfolio`. A session is
//! created by `open` or by the first add to an unseen id. Reads never
//! create one. Sessions live until `end` or until idle expiry.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::portfolio::Portfolio;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub portfolio: Portfolio,
}

impl Session {
    fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            started_at: now,
            last_seen: now,
            portfolio: Portfolio::new(),
        }
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session and return its id.
    pub async fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, Session::new(id));
        info!(session_id = %id, "Session opened");
        id
    }

    /// Run `f` against the session's portfolio, creating the session if
    /// this is the first time `id` is seen.
    pub async fn with_portfolio<R>(&self, id: Uuid, f: impl FnOnce(&mut Portfolio) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id).or_insert_with(|| {
            debug!(session_id = %id, "Session initialised on first use");
            Session::new(id)
        });
        session.last_seen = Utc::now();
        f(&mut session.portfolio)
    }

    /// Run `f` against an existing session's portfolio. `None` for an
    /// unknown id, which is left unknown.
    pub async fn with_existing<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Portfolio) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_seen = Utc::now();
        Some(f(&mut session.portfolio))
    }

    /// Copy of an existing session's portfolio.
    pub async fn portfolio(&self, id: Uuid) -> Option<Portfolio> {
        self.with_existing(id, |p| p.clone()).await
    }

    /// Tear down a session. Returns whether it existed.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match &removed {
            Some(s) => info!(
                session_id = %id,
                entries = s.portfolio.len(),
                age_secs = (Utc::now() - s.started_at).num_seconds(),
                "Session ended"
            ),
            None => debug!(session_id = %id, "End requested for unknown session"),
        }
        removed.is_some()
    }

    /// Drop every session not touched within `max_idle`. Returns how many
    /// were removed.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|d| Utc::now().checked_sub_signed(d))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen > cutoff);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, remaining = sessions.len(), "Idle sessions expired");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortfolioEntry;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_open_creates_empty_session() {
        let store = SessionStore::new();
        let id = store.open().await;
        assert_eq!(store.len().await, 1);
        assert!(store.portfolio(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_add_initialises() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(store.is_empty().await);
        store
            .with_portfolio(id, |p| p.add(PortfolioEntry::new("Pikachu", "Base", dec!(3))))
            .await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.portfolio(id).await.unwrap().total(), dec!(3));
    }

    #[tokio::test]
    async fn test_reads_of_unknown_ids_create_nothing() {
        let store = SessionStore::new();
        for _ in 0..1000 {
            let id = Uuid::new_v4();
            assert!(store.portfolio(id).await.is_none());
            assert!(store.with_existing(id, |p| p.clear()).await.is_none());
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.open().await;
        let b = store.open().await;
        store
            .with_portfolio(a, |p| p.add(PortfolioEntry::new("Pikachu", "Base", dec!(5))))
            .await;
        assert_eq!(store.portfolio(a).await.unwrap().len(), 1);
        assert!(store.portfolio(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_tears_down() {
        let store = SessionStore::new();
        let id = store.open().await;
        store
            .with_portfolio(id, |p| p.add(PortfolioEntry::new("Pikachu", "Base", dec!(5))))
            .await;
        assert!(store.end(id).await);
        assert!(!store.end(id).await);
        assert!(store.is_empty().await);
        assert!(store.portfolio(id).await.is_none());
    }

    #[tokio::test]
    async fn test_expire_idle() {
        let store = SessionStore::new();
        store.open().await;
        store.open().await;

        assert_eq!(store.expire_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(store.len().await, 2);

        assert_eq!(store.expire_idle(Duration::ZERO).await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expire_idle_keeps_recently_touched() {
        let store = SessionStore::new();
        let stale = store.open().await;
        let active = store.open().await;
        {
            let mut sessions = store.sessions.write().await;
            let old = Utc::now() - chrono::Duration::hours(3);
            for s in sessions.values_mut() {
                s.last_seen = old;
            }
        }
        store.portfolio(active).await;

        assert_eq!(store.expire_idle(Duration::from_secs(3600)).await, 1);
        assert!(store.portfolio(stale).await.is_none());
        assert!(store.portfolio(active).await.is_some());
    }

    #[test]
    fn test_blocking_use() {
        let store = SessionStore::new();
        let id = tokio_test::block_on(store.open());
        let total = tokio_test::block_on(store.with_portfolio(id, |p| {
            p.add(PortfolioEntry::new("Eevee", "Jungle", dec!(2.5)));
            p.total()
        }));
        assert_eq!(total, dec!(2.5));
    }
}
