// storefront/src/session.rs

//! Server-side visitor sessions, addressed by an HTTP-only cookie.

use actix_web::cookie::{Cookie, SameSite};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;
use wingtip_cart::SessionStore;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct SessionEntry {
  values: HashMap<String, String>,
  last_seen: Instant,
}

impl SessionEntry {
  fn new(now: Instant) -> Self {
    Self {
      values: HashMap::new(),
      last_seen: now,
    }
  }
}

/// Shared map of live sessions.
///
/// A session is only stored once something is written to it, and sessions left idle for
/// longer than the timeout are swept out.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
  sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
  idle_timeout: Duration,
  last_sweep: Arc<Mutex<Instant>>,
}

impl Default for SessionRegistry {
  fn default() -> Self {
    Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
  }
}

impl SessionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
    Self {
      sessions: Arc::default(),
      idle_timeout,
      last_sweep: Arc::new(Mutex::new(Instant::now())),
    }
  }

  /// Opens the session named by the request cookie. Unknown, expired or missing ids get a
  /// fresh session id; client-chosen ids are never adopted.
  pub fn open(&self, cookie_value: Option<&str>) -> ServerSession {
    let now = Instant::now();
    self.sweep_if_due(now);

    if let Some(id) = cookie_value {
      let mut sessions = self.sessions.write();
      let idle = sessions.get(id).map(|entry| self.is_idle(entry, now));
      match idle {
        Some(false) => {
          if let Some(entry) = sessions.get_mut(id) {
            entry.last_seen = now;
          }
          return ServerSession {
            registry: self.clone(),
            id: id.to_string(),
            is_new: false,
          };
        }
        Some(true) => {
          sessions.remove(id);
          debug!(session_id = %id, "Dropped expired visitor session.");
        }
        None => {}
      }
    }

    let id = Uuid::new_v4().to_string();
    debug!(session_id = %id, "Issued new visitor session id.");
    ServerSession {
      registry: self.clone(),
      id,
      is_new: true,
    }
  }

  /// Removes every session idle at `now`, returning how many were dropped.
  pub fn evict_idle(&self, now: Instant) -> usize {
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, entry| !self.is_idle(entry, now));
    let evicted = before - sessions.len();
    if evicted > 0 {
      debug!(evicted, active_sessions = sessions.len(), "Evicted idle visitor sessions.");
    }
    evicted
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  fn is_idle(&self, entry: &SessionEntry, now: Instant) -> bool {
    now.saturating_duration_since(entry.last_seen) > self.idle_timeout
  }

  fn sweep_if_due(&self, now: Instant) {
    {
      let mut last_sweep = self.last_sweep.lock();
      if now.saturating_duration_since(*last_sweep) < self.idle_timeout.min(MAX_SWEEP_INTERVAL) {
        return;
      }
      *last_sweep = now;
    }
    self.evict_idle(now);
  }
}

/// One visitor's session, writing through to the registry.
#[derive(Debug, Clone)]
pub struct ServerSession {
  registry: SessionRegistry,
  id: String,
  is_new: bool,
}

impl ServerSession {
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn is_new(&self) -> bool {
    self.is_new
  }

  pub fn cookie(&self, name: &str) -> Cookie<'static> {
    Cookie::build(name.to_string(), self.id.clone())
      .path("/")
      .http_only(true)
      .same_site(SameSite::Lax)
      .finish()
  }
}

impl SessionStore for ServerSession {
  fn get(&self, key: &str) -> Option<String> {
    self
      .registry
      .sessions
      .read()
      .get(&self.id)
      .and_then(|entry| entry.values.get(key).cloned())
  }

  fn insert(&mut self, key: &str, value: String) {
    let now = Instant::now();
    let mut sessions = self.registry.sessions.write();
    let entry = sessions
      .entry(self.id.clone())
      .or_insert_with(|| SessionEntry::new(now));
    entry.last_seen = now;
    entry.values.insert(key.to_string(), value);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn values_survive_reopening_by_cookie() {
    let registry = SessionRegistry::new();
    let mut first = registry.open(None);
    assert!(first.is_new());
    first.insert("CartId", "anon-1".to_string());

    let again = registry.open(Some(first.id()));
    assert!(!again.is_new());
    assert_eq!(again.get("CartId").as_deref(), Some("anon-1"));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn unknown_cookie_gets_a_fresh_session() {
    let registry = SessionRegistry::new();
    let session = registry.open(Some("forged-id"));
    assert!(session.is_new());
    assert_ne!(session.id(), "forged-id");
    assert_eq!(session.get("CartId"), None);
  }

  #[test]
  fn opening_without_writing_stores_nothing() {
    let registry = SessionRegistry::new();
    for _ in 0..1_000 {
      registry.open(None);
      registry.open(Some("forged-id"));
    }
    assert_eq!(registry.len(), 0);
  }

  #[test]
  fn idle_sessions_are_evicted() {
    let timeout = Duration::from_secs(60);
    let registry = SessionRegistry::with_idle_timeout(timeout);
    let mut idle = registry.open(None);
    idle.insert("CartId", "anon-1".to_string());
    let mut active = registry.open(None);
    active.insert("CartId", "anon-2".to_string());
    assert_eq!(registry.len(), 2);

    let later = Instant::now() + timeout + Duration::from_secs(1);
    assert_eq!(registry.evict_idle(later), 2);
    assert_eq!(registry.len(), 0);

    let reopened = registry.open(Some(idle.id()));
    assert!(reopened.is_new());
    assert_eq!(reopened.get("CartId"), None);
  }

  #[test]
  fn recently_seen_sessions_survive_eviction() {
    let registry = SessionRegistry::with_idle_timeout(Duration::from_secs(60));
    let mut session = registry.open(None);
    session.insert("CartId", "anon-1".to_string());

    assert_eq!(registry.evict_idle(Instant::now()), 0);
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn expired_session_is_never_reopened() {
    let registry = SessionRegistry::with_idle_timeout(Duration::ZERO);
    let mut session = registry.open(None);
    session.insert("CartId", "anon-1".to_string());
    std::thread::sleep(Duration::from_millis(5));

    let reopened = registry.open(Some(session.id()));
    assert!(reopened.is_new());
    assert_ne!(reopened.id(), session.id());
    assert_eq!(registry.len(), 0);
  }

  #[test]
  fn cookie_carries_session_id() {
    let registry = SessionRegistry::new();
    let session = registry.open(None);
    let cookie = session.cookie("wingtip_session");
    assert_eq!(cookie.name(), "wingtip_session");
    assert_eq!(cookie.value(), session.id());
    assert_eq!(cookie.http_only(), Some(true));
  }
}
