//! In-memory chat sessions keyed by id.
//!
//! Each session owns one `Chatbot` behind a `tokio::sync::Mutex`, so turns in
//! the same conversation are serialized while different sessions run in
//! parallel. Sessions idle longer than the TTL are dropped by `prune_idle`;
//! past `max_sessions` the least recently used session makes room for a new
//! one.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use amina_agent::{Chatbot, ChatbotFactory};
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct Session {
    pub id: String,
    pub chatbot: Mutex<Chatbot>,
    /// Unix millis of the last request touching this session.
    last_seen: AtomicI64,
}

impl Session {
    fn new(id: String, chatbot: Chatbot) -> Self {
        Self {
            id,
            chatbot: Mutex::new(chatbot),
            last_seen: AtomicI64::new(now_ms()),
        }
    }

    fn touch(&self) {
        self.last_seen.store(now_ms(), Ordering::Relaxed);
    }

    fn idle_ms(&self, now: i64) -> i64 {
        now - self.last_seen.load(Ordering::Relaxed)
    }
}

pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
    ttl_ms: i64,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(ttl_secs: u64, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_ms: i64::try_from(ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Existing session for `id`, or a fresh one. A missing id gets a new
    /// UUID; an unknown id (e.g. expired) is recreated under the same name.
    pub fn get_or_create(&self, id: Option<&str>, factory: &ChatbotFactory) -> Arc<Session> {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        // capacity is checked outside `entry` so no shard lock is held
        if !self.sessions.contains_key(&id) && self.sessions.len() >= self.max_sessions {
            self.make_room();
        }
        let session = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(session = %id, "session created");
                Arc::new(Session::new(id.clone(), factory.build()))
            })
            .value()
            .clone();
        session.touch();
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.get(id).map(|s| s.value().clone())?;
        session.touch();
        Some(session)
    }

    /// Drop sessions idle longer than the TTL; returns how many went.
    pub fn prune_idle(&self) -> usize {
        let now = now_ms();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.idle_ms(now) <= self.ttl_ms);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            info!(removed, remaining = self.sessions.len(), "idle sessions evicted");
        }
        removed
    }

    fn make_room(&self) {
        if self.prune_idle() > 0 && self.sessions.len() < self.max_sessions {
            return;
        }
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|s| s.last_seen.load(Ordering::Relaxed))
            .map(|s| s.key().clone());
        if let Some(id) = oldest {
            self.sessions.remove(&id);
            warn!(
                session = %id,
                max_sessions = self.max_sessions,
                "session limit reached, evicted least recently used"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
