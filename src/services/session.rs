use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::models::ConversationContext;

/// Per-session conversation state, read at the start of a turn and
/// written at the end. Concurrent turns on one session are last-writer-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Option<ConversationContext>;
    async fn save(&self, session_id: &str, ctx: ConversationContext);
    /// Drops expired sessions, returning how many were removed.
    async fn evict_expired(&self) -> usize;
    async fn len(&self) -> usize;
}

struct Entry {
    ctx: ConversationContext,
    expires_at: Instant,
}

pub struct InMemorySessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Option<ConversationContext> {
        let entries = self.entries();
        entries
            .get(session_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.ctx.clone())
    }

    async fn save(&self, session_id: &str, ctx: ConversationContext) {
        let expires_at = Instant::now() + self.ttl;
        self.entries()
            .insert(session_id.to_string(), Entry { ctx, expires_at });
    }

    async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    async fn len(&self) -> usize {
        self.entries().len()
    }
}

/// Periodically evicts expired sessions for the life of the process.
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = store.evict_expired().await;
            if evicted > 0 {
                let remaining = store.len().await;
                tracing::debug!(evicted, remaining, "swept expired sessions");
            }
        }
    })
}
