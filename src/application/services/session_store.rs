//! Session store - Tracks active sessions and expires them in the background

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::entities::{ChatEvent, Session, SessionId, SessionKind};

/// Default period of the background sweep
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// Default idle threshold compared by the sweep
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(3 * 60);

/// Expiry predicate applied by the periodic sweep.
///
/// A session is swept while its idle time is still *below* the threshold,
/// which removes fresh sessions and keeps stale ones. This is the behavior
/// the bot has always shipped with; it is kept here, in one place, until the
/// intended policy is confirmed.
pub fn sweep_expires(idle: Duration, threshold: Duration) -> bool {
    idle < threshold
}

struct SessionEntry {
    session: Arc<Session>,
    last_touched: Instant,
    auto_close: Option<JoinHandle<()>>,
    /// Set once the auto-close timer has fired and the hook is running
    closing: bool,
}

impl SessionEntry {
    fn new(session: Arc<Session>, now: Instant) -> Self {
        Self {
            session,
            last_touched: now,
            auto_close: None,
            closing: false,
        }
    }

    /// Entries owned by an auto-close timer are never swept
    fn is_auto_closing(&self) -> bool {
        self.auto_close.is_some() || self.closing
    }

    fn cancel_auto_close(&mut self) {
        if let Some(timer) = self.auto_close.take() {
            timer.abort();
        }
    }
}

type SessionMap = Arc<Mutex<HashMap<SessionId, SessionEntry>>>;

fn lock(map: &Mutex<HashMap<SessionId, SessionEntry>>) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
    match map.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Snapshot of one tracked session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session: Arc<Session>,
    pub idle: Duration,
    pub auto_close: bool,
}

/// Store of active sessions.
///
/// Lookups, inserts and removals take a short lock on the session map that
/// is never held across an `.await`. The periodic sweep and auto-close timers
/// are tokio tasks owned by the store and aborted when it is shut down.
pub struct SessionStore {
    sessions: SessionMap,
    idle_threshold: Duration,
    sweep_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    pub fn new(idle_threshold: Duration, sweep_interval: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_threshold,
            sweep_interval,
            sweeper: Mutex::new(None),
        }
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    /// Insert a session, or refresh its last-touch time if already tracked
    pub fn put(&self, session: impl Into<Arc<Session>>) -> Arc<Session> {
        let session = session.into();
        let now = Instant::now();
        let mut sessions = lock(&self.sessions);
        sessions
            .entry(session.id())
            .and_modify(|entry| entry.last_touched = now)
            .or_insert_with(|| SessionEntry::new(Arc::clone(&session), now));
        tracing::debug!("[session] tracking {}", session);
        session
    }

    /// Insert a session that closes itself after `delay`.
    ///
    /// When the timer fires the owning command's
    /// [`before_session_expired`](crate::domain::traits::ChatCommand::before_session_expired)
    /// hook is awaited and the session is removed, whatever activity happened
    /// in between. The periodic sweep leaves such sessions alone; only an
    /// explicit [`remove`](Self::remove) before the timer fires cancels it.
    pub fn put_with_auto_close(&self, session: impl Into<Arc<Session>>, delay: Duration) -> Arc<Session> {
        let session: Arc<Session> = session.into();
        let map = Arc::clone(&self.sessions);
        let target = Arc::clone(&session);
        let now = Instant::now();

        // Spawned and stored under the lock so the timer never sees the entry
        // without its own handle
        let mut sessions = lock(&self.sessions);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Detach from the entry so a concurrent removal cannot abort the hook
            match lock(&map).get_mut(&target.id()) {
                Some(entry) => {
                    entry.closing = true;
                    drop(entry.auto_close.take());
                }
                None => return,
            }

            tracing::info!("[session] auto-closing {}", target);
            target.command().before_session_expired(&target).await;
            lock(&map).remove(&target.id());
        });

        let entry = sessions
            .entry(session.id())
            .or_insert_with(|| SessionEntry::new(Arc::clone(&session), now));
        entry.last_touched = now;
        entry.cancel_auto_close();
        entry.auto_close = Some(timer);
        drop(sessions);

        tracing::debug!("[session] tracking {} (auto-close in {:?})", session, delay);
        session
    }

    /// Refresh the last-touch time of a tracked session
    pub fn touch(&self, id: SessionId) -> bool {
        match lock(&self.sessions).get_mut(&id) {
            Some(entry) => {
                entry.last_touched = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Explicitly close a session
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = lock(&self.sessions).remove(&id);
        match removed {
            Some(mut entry) => {
                entry.cancel_auto_close();
                tracing::debug!("[session] closed {}", entry.session);
                true
            }
            None => false,
        }
    }

    /// Close the session resolvable by a user id, else by a group id
    pub fn remove_by_owner_id(&self, id: &str) -> bool {
        let target = self
            .find_by_user_id(id)
            .or_else(|| self.find_by_group_id(id, None));
        match target {
            Some(session) => self.remove(session.id()),
            None => false,
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        lock(&self.sessions).contains_key(&id)
    }

    pub fn find_by_user_id(&self, user_id: &str) -> Option<Arc<Session>> {
        lock(&self.sessions)
            .values()
            .find(|entry| entry.session.accepts_user(user_id))
            .map(|entry| Arc::clone(&entry.session))
    }

    pub fn find_by_group_id(&self, group_id: &str, kind: Option<SessionKind>) -> Option<Arc<Session>> {
        lock(&self.sessions)
            .values()
            .find(|entry| {
                entry.session.group_id() == Some(group_id)
                    && kind.map_or(true, |k| entry.session.kind() == k)
            })
            .map(|entry| Arc::clone(&entry.session))
    }

    /// Group-scoped session first for group events, then the sender's own
    pub fn resolve_for_event(&self, event: &ChatEvent) -> Option<Arc<Session>> {
        if let Some(group_id) = &event.group_id {
            if let Some(session) = self.find_by_group_id(group_id, None) {
                return Some(session);
            }
        }
        self.find_by_user_id(&event.sender.id)
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sessions(&self) -> Vec<SessionInfo> {
        let now = Instant::now();
        lock(&self.sessions)
            .values()
            .map(|entry| SessionInfo {
                session: Arc::clone(&entry.session),
                idle: now.saturating_duration_since(entry.last_touched),
                auto_close: entry.is_auto_closing(),
            })
            .collect()
    }

    /// Run one sweep pass immediately, returning the number of sessions removed
    pub fn sweep_now(&self) -> usize {
        sweep(&self.sessions, self.idle_threshold)
    }

    /// Start the periodic sweep; the first pass runs one interval from now
    pub fn spawn_sweeper(&self) {
        let map = Arc::clone(&self.sessions);
        let period = self.sweep_interval;
        let threshold = self.idle_threshold;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let removed = sweep(&map, threshold);
                if removed > 0 {
                    tracing::debug!("[session] sweep expired {} session(s)", removed);
                }
            }
        });

        let mut sweeper = match self.sweeper.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(old) = sweeper.replace(handle) {
            old.abort();
        }
        tracing::info!(
            "Session sweeper started (interval={:?}, idle_threshold={:?})",
            period,
            threshold
        );
    }

    /// Stop the sweeper and every pending auto-close timer
    pub fn shutdown(&self) {
        if let Ok(mut sweeper) = self.sweeper.lock() {
            if let Some(handle) = sweeper.take() {
                handle.abort();
            }
        }
        for entry in lock(&self.sessions).values_mut() {
            entry.cancel_auto_close();
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_THRESHOLD, DEFAULT_SWEEP_INTERVAL)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sweep(map: &Mutex<HashMap<SessionId, SessionEntry>>, threshold: Duration) -> usize {
    let now = Instant::now();
    let mut sessions = lock(map);
    let before = sessions.len();
    sessions.retain(|_, entry| {
        entry.is_auto_closing()
            || !sweep_expires(now.saturating_duration_since(entry.last_touched), threshold)
    });
    before - sessions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use crate::application::errors::CommandError;
    use crate::domain::entities::{CommandProps, MessageChain, UserRecord};
    use crate::domain::traits::ChatCommand;

    struct Recorder {
        props: CommandProps,
        expired: AtomicUsize,
        hook_delay: Duration,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Self::slow(Duration::ZERO)
        }

        fn slow(hook_delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                props: CommandProps::new("draw"),
                expired: AtomicUsize::new(0),
                hook_delay,
            })
        }
    }

    #[async_trait]
    impl ChatCommand for Recorder {
        fn props(&self) -> &CommandProps {
            &self.props
        }

        async fn execute(&self, _: &ChatEvent, _: &[String], _: &UserRecord) -> Result<MessageChain, CommandError> {
            Ok(MessageChain::empty())
        }

        async fn before_session_expired(&self, _session: &Session) {
            tokio::time::sleep(self.hook_delay).await;
            self.expired.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_sweep_predicate_is_pinned() {
        let threshold = Duration::from_secs(180);
        assert!(sweep_expires(Duration::from_secs(10), threshold));
        assert!(!sweep_expires(Duration::from_secs(180), threshold));
        assert!(!sweep_expires(Duration::from_secs(600), threshold));
    }

    #[tokio::test]
    async fn test_lookup_by_user_and_group() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let user = store.put(Session::persistent(cmd.clone()).with_member("alice"));
        let group = store.put(Session::transient(cmd).with_group("g1"));

        assert_eq!(store.find_by_user_id("alice").unwrap().id(), user.id());
        assert!(store.find_by_user_id("bob").is_none());
        assert_eq!(store.find_by_group_id("g1", None).unwrap().id(), group.id());
        assert!(store.find_by_group_id("g1", Some(SessionKind::Persistent)).is_none());
        assert!(store.find_by_group_id("g1", Some(SessionKind::Transient)).is_some());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_for_event_prefers_group() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let user = store.put(Session::persistent(cmd.clone()).with_member("alice"));
        let group = store.put(Session::persistent(cmd).with_group("g1"));

        let in_group = ChatEvent::group("g1", "alice", "hello");
        assert_eq!(store.resolve_for_event(&in_group).unwrap().id(), group.id());

        let other_group = ChatEvent::group("g2", "alice", "hello");
        assert_eq!(store.resolve_for_event(&other_group).unwrap().id(), user.id());

        // Private events never see group sessions
        assert!(store.remove(user.id()));
        assert!(store.resolve_for_event(&ChatEvent::private("alice", "hi")).is_none());
    }

    #[tokio::test]
    async fn test_remove_by_owner_id() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        store.put(Session::persistent(cmd.clone()).with_member("alice"));
        store.put(Session::persistent(cmd).with_group("g1"));

        assert!(store.remove_by_owner_id("alice"));
        assert!(store.remove_by_owner_id("g1"));
        assert!(!store.remove_by_owner_id("alice"));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_close_runs_hook_once() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let session = store.put_with_auto_close(
            Session::persistent(cmd.clone()).with_member("alice"),
            Duration::from_secs(60),
        );

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(store.touch(session.id()));
        assert!(store.contains(session.id()));

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(!store.contains(session.id()));
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_close_cancels_auto_close() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let session = store.put_with_auto_close(Session::transient(cmd.clone()), Duration::from_secs(60));

        assert!(store.remove(session.id()));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_fresh_and_keeps_stale() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let stale = store.put(Session::persistent(cmd.clone()).with_member("old"));
        tokio::time::advance(Duration::from_secs(200)).await;
        let fresh = store.put(Session::persistent(cmd).with_member("new"));

        assert_eq!(store.sweep_now(), 1);
        assert!(store.contains(stale.id()));
        assert!(!store.contains(fresh.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_skips_auto_close_sessions() {
        let store = SessionStore::default();
        let cmd = Recorder::new();
        let timed = store.put_with_auto_close(Session::transient(cmd.clone()).with_group("g1"), Duration::from_secs(60));
        let plain = store.put(Session::persistent(cmd.clone()).with_member("alice"));

        assert_eq!(store.sweep_now(), 1);
        assert!(store.contains(timed.id()));
        assert!(!store.contains(plain.id()));
        assert!(store.sessions()[0].auto_close);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_close_survives_running_sweeper() {
        let store = SessionStore::default();
        store.spawn_sweeper();
        let cmd = Recorder::new();

        // Inserted 30s before a sweep tick that would take a plain session
        tokio::time::sleep(Duration::from_secs(150)).await;
        let session = store.put_with_auto_close(
            Session::transient(cmd.clone()).with_group("g1"),
            Duration::from_secs(60),
        );

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert!(store.contains(session.id()));
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(75)).await;
        assert!(!store.contains(session.id()));
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 1);
        store.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_during_hook_lets_it_finish() {
        let store = SessionStore::default();
        let cmd = Recorder::slow(Duration::from_secs(10));
        let session = store.put_with_auto_close(Session::transient(cmd.clone()), Duration::ZERO);
        assert!(store.sessions()[0].auto_close);

        // Timer has fired and the hook is mid-flight
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.remove(session.id()));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(cmd.expired.load(Ordering::SeqCst), 1);
        assert!(!store.contains(session.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweeper_runs_on_interval() {
        let store = SessionStore::default();
        store.spawn_sweeper();
        let cmd = Recorder::new();

        tokio::time::sleep(Duration::from_secs(60)).await;
        let session = store.put(Session::persistent(cmd).with_member("alice"));

        // First pass at 180s sees 120s of idle time
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(!store.contains(session.id()));
        store.shutdown();
    }
}
