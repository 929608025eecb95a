// ============================================================================
// In-memory session store
// ============================================================================
//
// One session per user identifier (web session id or messaging phone number).
// All state lives behind a single `Mutex`; every turn takes the lock once to
// read and once to record, so concurrent turns for the same user serialize
// cleanly without per-session locks.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use astra_core::config::SessionConfig;
use astra_core::text;

/// Most recent exchanges kept per session.
const MAX_HISTORY: usize = 10;

/// Bot responses are clipped to this many characters before entering history.
const HISTORY_SNIPPET_CHARS: usize = 100;

/// A single user/bot exchange, as remembered by the session.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub bot_response: String,
}

/// Per-user conversation state.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: String,
    pub history: Vec<HistoryEntry>,
    pub interaction_count: u64,
    pub last_query: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl UserSession {
    fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            history: Vec::new(),
            interaction_count: 0,
            last_query: None,
            created_at: now,
            last_activity: now,
        }
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, UserSession>>,
    max_sessions: usize,
    idle_timeout: Duration,
    deep_sweep_horizon: Duration,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: config.max_sessions,
            idle_timeout: Duration::seconds(config.idle_timeout_secs as i64),
            deep_sweep_horizon: Duration::hours(config.deep_sweep_hours as i64),
        }
    }

    /// Fetches the session for `user_id`, creating it on first contact, and
    /// refreshes its activity timestamp. Returns a snapshot for the caller to
    /// read; mutation goes through [`record`](Self::record).
    pub fn touch(&self, user_id: &str) -> UserSession {
        let now = Utc::now();
        let mut sessions = self.lock();
        Self::make_room(&mut sessions, user_id, self.max_sessions);
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id, now));
        session.last_activity = now;
        session.clone()
    }

    /// Records a completed exchange. The bot response is clipped before it
    /// enters history so runaway replies cannot bloat the store; history is
    /// capped FIFO at the most recent [`MAX_HISTORY`] entries.
    pub fn record(&self, user_id: &str, user_message: &str, bot_response: &str) {
        let now = Utc::now();
        let mut sessions = self.lock();
        Self::make_room(&mut sessions, user_id, self.max_sessions);
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id, now));

        session.history.push(HistoryEntry {
            timestamp: now,
            user_message: user_message.to_string(),
            bot_response: text::clip_with_ellipsis(bot_response, HISTORY_SNIPPET_CHARS),
        });
        if session.history.len() > MAX_HISTORY {
            let overflow = session.history.len() - MAX_HISTORY;
            session.history.drain(..overflow);
        }

        session.interaction_count += 1;
        session.last_query = Some(user_message.to_string());
        session.last_activity = now;
    }

    /// Lazy cleanup, run at the start of each turn: drops sessions idle past
    /// the timeout, then evicts oldest-by-activity sessions until the store
    /// is back under its cap.
    pub fn sweep(&self) {
        let now = Utc::now();
        let mut sessions = self.lock();

        sessions.retain(|_, s| now - s.last_activity <= self.idle_timeout);

        while sessions.len() > self.max_sessions {
            if !Self::evict_oldest(&mut sessions) {
                break;
            }
        }
    }

    /// Evicts oldest-by-activity sessions until a new entry for `user_id`
    /// would fit under the cap. Existing sessions never need room.
    fn make_room(sessions: &mut HashMap<String, UserSession>, user_id: &str, max: usize) {
        if sessions.contains_key(user_id) {
            return;
        }
        while sessions.len() >= max {
            if !Self::evict_oldest(sessions) {
                break;
            }
        }
    }

    fn evict_oldest(sessions: &mut HashMap<String, UserSession>) -> bool {
        let oldest = sessions
            .values()
            .min_by_key(|s| s.last_activity)
            .map(|s| s.user_id.clone());
        match oldest {
            Some(id) => {
                tracing::debug!(user_id = %id, "evicting oldest session at cap");
                sessions.remove(&id);
                true
            }
            None => false,
        }
    }

    /// Deep sweep for long-running processes: drops any session that has not
    /// been active inside the deep-sweep horizon, regardless of the cap.
    pub fn deep_sweep(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_activity <= self.deep_sweep_horizon);
        before - sessions.len()
    }

    /// Number of sessions currently held.
    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get(&self, user_id: &str) -> Option<UserSession> {
        self.lock().get(user_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserSession>> {
        // A poisoned lock only means another turn panicked mid-update; the
        // map itself is still usable.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(&SessionConfig::default())
    }

    fn store_with(max_sessions: usize, idle_timeout_secs: u64) -> SessionStore {
        SessionStore::new(&SessionConfig {
            max_sessions,
            idle_timeout_secs,
            deep_sweep_hours: 24,
        })
    }

    // ---- touch / record ----

    #[test]
    fn touch_creates_session_on_first_contact() {
        let store = store();
        let session = store.touch("user-1");
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.interaction_count, 0);
        assert!(session.history.is_empty());
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn record_appends_history_and_counts() {
        let store = store();
        store.touch("user-1");
        store.record("user-1", "how many satellites", "There are 104 satellites.");
        store.record("user-1", "thanks", "Thanks for exploring!");

        let session = store.get("user-1").unwrap();
        assert_eq!(session.interaction_count, 2);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.last_query.as_deref(), Some("thanks"));
        assert_eq!(session.history[0].user_message, "how many satellites");
    }

    #[test]
    fn record_clips_long_bot_responses() {
        let store = store();
        let long_reply = "x".repeat(500);
        store.record("user-1", "hello", &long_reply);

        let session = store.get("user-1").unwrap();
        let kept = &session.history[0].bot_response;
        assert_eq!(kept.chars().count(), HISTORY_SNIPPET_CHARS + 3);
        assert!(kept.ends_with("..."));
    }

    #[test]
    fn history_is_capped_fifo() {
        let store = store();
        for i in 0..15 {
            store.record("user-1", &format!("question {i}"), "reply");
        }

        let session = store.get("user-1").unwrap();
        assert_eq!(session.history.len(), MAX_HISTORY);
        assert_eq!(session.history[0].user_message, "question 5");
        assert_eq!(session.history[9].user_message, "question 14");
        assert_eq!(session.interaction_count, 15);
    }

    // ---- sweep ----

    #[test]
    fn cap_evicts_oldest_before_creating_new() {
        let store = store_with(3, 3600);
        for i in 0..3 {
            store.touch(&format!("user-{i}"));
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(store.active_count(), 3);

        // A fourth user displaces the globally oldest session.
        store.touch("user-3");
        assert_eq!(store.active_count(), 3);
        assert!(store.get("user-0").is_none());
        assert!(store.get("user-3").is_some());
    }

    #[test]
    fn touching_existing_session_never_evicts() {
        let store = store_with(2, 3600);
        store.touch("user-0");
        store.touch("user-1");
        store.touch("user-0");
        assert_eq!(store.active_count(), 2);
        assert!(store.get("user-1").is_some());
    }

    #[test]
    fn sweep_drops_idle_sessions() {
        let store = store_with(100, 0);
        store.touch("user-1");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.sweep();
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn deep_sweep_reports_removed_count() {
        let store = store();
        store.touch("user-1");
        store.touch("user-2");
        assert_eq!(store.deep_sweep(), 0);
        assert_eq!(store.active_count(), 2);
    }
}
