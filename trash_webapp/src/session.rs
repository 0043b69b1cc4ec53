use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use parking_lot::Mutex;
use std::{collections::HashMap, time::Instant};
use trash_prediction::Verdict;

pub const SESSION_COOKIE: &str = "trash_session";
const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub verdict: Verdict,
    /// `data:` URI of a downscaled copy of the upload.
    pub preview: Option<String>,
}

/// What one visitor's page shows between requests. Cleared by the reset button.
#[derive(Debug, Default)]
pub struct SessionState {
    pub last_analysis: Option<Analysis>,
}

impl SessionState {
    pub fn record(&mut self, analysis: Analysis) {
        self.last_analysis = Some(analysis);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

/// Session states keyed by the id carried in the session cookie. The least
/// recently seen session is dropped once `max_sessions` is reached.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

pub fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Reads the visitor's session id from the cookie jar, issuing a fresh one
/// when the request carried none.
pub fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        return (jar, id);
    }

    let id = new_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

impl SessionStore {
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn last_analysis(&self, session_id: &str) -> Option<Analysis> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = Instant::now();
        entry.state.last_analysis.clone()
    }

    pub fn record(&self, session_id: &str, analysis: Analysis) {
        let mut sessions = self.sessions.lock();
        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
            }
        }

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                state: SessionState::default(),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        entry.state.record(analysis);
    }

    pub fn reset(&self, session_id: &str) {
        let mut sessions = self.sessions.lock();
        if let Some(mut entry) = sessions.remove(session_id) {
            entry.state.reset();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::analysis;

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = SessionState::default();
        session.record(analysis("bin.png", 0.3));
        assert!(session.last_analysis.is_some());

        session.reset();

        assert!(session.last_analysis.is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        store.record("visitor-a", analysis("a.png", 0.82));
        store.record("visitor-b", analysis("b.png", 0.10));

        assert_eq!(store.last_analysis("visitor-a").unwrap().file_name, "a.png");
        assert_eq!(store.last_analysis("visitor-b").unwrap().file_name, "b.png");
        assert!(store.last_analysis("visitor-c").is_none());

        store.reset("visitor-b");

        assert!(store.last_analysis("visitor-b").is_none());
        assert_eq!(store.last_analysis("visitor-a").unwrap().file_name, "a.png");
    }

    #[test]
    fn test_least_recently_seen_session_is_evicted() {
        let store = SessionStore::with_capacity(2);
        store.record("first", analysis("1.png", 0.9));
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.record("second", analysis("2.png", 0.9));
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.last_analysis("first");
        store.record("third", analysis("3.png", 0.9));

        assert_eq!(store.len(), 2);
        assert!(store.last_analysis("first").is_some());
        assert!(store.last_analysis("second").is_none());
        assert!(store.last_analysis("third").is_some());
    }

    #[test]
    fn test_session_cookie_is_issued_once() {
        let (jar, id) = session_id(CookieJar::new());
        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.value(), id);
        assert_eq!(cookie.http_only(), Some(true));

        let (_, same_id) = session_id(jar);
        assert_eq!(same_id, id);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let first = new_session_id();
        let second = new_session_id();

        assert_eq!(first.len(), 32);
        assert_ne!(first, second);
    }
}
