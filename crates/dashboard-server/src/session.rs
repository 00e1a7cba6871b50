//! Per-visitor dashboard state keyed by the `investiq_session` cookie.

use analysis_core::{ChatMessage, InsightReport, StockSnapshot};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "investiq_session";
pub const MAX_CHAT_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct Session {
    pub chat_history: Vec<ChatMessage>,
    pub current_snapshot: Option<StockSnapshot>,
    pub current_report: Option<InsightReport>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            chat_history: Vec::new(),
            current_snapshot: None,
            current_report: None,
            last_seen: now,
        }
    }

    /// Append a message, dropping the oldest ones past the cap.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
        if self.chat_history.len() > MAX_CHAT_HISTORY {
            let excess = self.chat_history.len() - MAX_CHAT_HISTORY;
            self.chat_history.drain(..excess);
        }
    }

    /// Replace the most recent assistant message equal to `pending`, or append
    /// when it has already been evicted.
    pub fn replace_pending(&mut self, pending: &str, message: ChatMessage) {
        let slot = self
            .chat_history
            .iter_mut()
            .rev()
            .find(|m| m.role == analysis_core::ChatRole::Assistant && m.content == pending);

        match slot {
            Some(slot) => *slot = message,
            None => self.push_message(message),
        }
    }

    pub fn set_result(&mut self, snapshot: StockSnapshot, report: InsightReport) {
        self.current_snapshot = Some(snapshot);
        self.current_report = Some(report);
    }

    /// Both halves of a result, or nothing.
    pub fn result(&self) -> Option<(&StockSnapshot, &InsightReport)> {
        self.current_snapshot.as_ref().zip(self.current_report.as_ref())
    }

    pub fn clear(&mut self) {
        self.current_snapshot = None;
        self.current_report = None;
        self.chat_history.clear();
    }
}

pub struct SessionStore {
    sessions: DashMap<String, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_secs: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout: Duration::seconds(idle_secs),
        }
    }

    /// Return `id` if it names a live session, otherwise start a new one.
    /// The boolean is true when a session was created.
    pub fn ensure(&self, id: Option<&str>) -> (String, bool) {
        let now = Utc::now();
        if let Some(id) = id {
            if let Some(mut session) = self.sessions.get_mut(id) {
                session.last_seen = now;
                return (id.to_string(), false);
            }
        }
        (self.create(now), true)
    }

    fn create(&self, now: DateTime<Utc>) -> String {
        let pruned = self.prune_idle(now);
        if pruned > 0 {
            tracing::debug!("Pruned {} idle sessions", pruned);
        }

        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Session::new(now));
        id
    }

    /// Drop sessions idle for longer than the timeout.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now - session.last_seen <= self.idle_timeout);
        before.saturating_sub(self.sessions.len())
    }

    /// Clone of the session state for rendering.
    pub fn snapshot(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Mutate a session in place. The map shard stays locked for the duration
    /// of `f`, so `f` must not await.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions.get_mut(id).map(|mut session| {
            session.last_seen = Utc::now();
            f(&mut session)
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_capped() {
        let mut session = Session::new(Utc::now());
        for i in 0..(MAX_CHAT_HISTORY + 7) {
            session.push_message(ChatMessage::user(format!("msg {i}")));
        }
        assert_eq!(session.chat_history.len(), MAX_CHAT_HISTORY);
        assert_eq!(session.chat_history[0].content, "msg 7");
    }

    #[test]
    fn test_replace_pending() {
        let mut session = Session::new(Utc::now());
        session.push_message(ChatMessage::user("TCS"));
        session.push_message(ChatMessage::assistant("🔍 Analyzing TCS..."));

        session.replace_pending("🔍 Analyzing TCS...", ChatMessage::assistant("done"));
        assert_eq!(session.chat_history.len(), 2);
        assert_eq!(session.chat_history[1].content, "done");

        session.replace_pending("🔍 Analyzing INFY...", ChatMessage::assistant("late"));
        assert_eq!(session.chat_history.len(), 3);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new(Utc::now());
        session.push_message(ChatMessage::user("TCS"));
        session.set_result(
            StockSnapshot::new("TCS.NS", "TCS", 1.0),
            InsightReport {
                insights: Vec::new(),
                investment_summary: String::new(),
                recommendation: None,
                risks: Vec::new(),
                source: "test".to_string(),
            },
        );
        assert!(session.result().is_some());

        session.clear();
        assert!(session.result().is_none());
        assert!(session.chat_history.is_empty());
    }

    #[test]
    fn test_ensure_reuses_known_and_replaces_unknown() {
        let store = SessionStore::new(7200);
        let (id, created) = store.ensure(None);
        assert!(created);

        let (same, created) = store.ensure(Some(&id));
        assert_eq!(same, id);
        assert!(!created);

        let (other, created) = store.ensure(Some("forged"));
        assert_ne!(other, "forged");
        assert!(created);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_idle_sessions_pruned() {
        let store = SessionStore::new(60);
        let (id, _) = store.ensure(None);
        store.update(&id, |s| s.last_seen = Utc::now() - Duration::seconds(120));

        assert_eq!(store.prune_idle(Utc::now()), 1);
        assert!(store.is_empty());
    }
}
