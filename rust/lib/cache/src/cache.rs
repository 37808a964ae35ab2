//! `LiveCache`: the owned cache object the UI talks to.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use stagecast_client::{
    Comment, FollowCounts, NewSession, ProfileUpdate, RegisterRequest, Session, SessionStatus,
    SocialApi, User,
};
use stagecast_flux::{Poller, StateStore};
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::handlers::helpers::{FeedSequencer, Interaction};
use crate::handlers::{
    auth_handlers, feed_handlers, follow_handlers, helpers, session_handlers,
};
use crate::state::*;

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    /// Period of the background refresh.
    pub poll_interval: Duration,
    /// Initial value of the realtime switch.
    pub realtime: bool,
}

impl CacheConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { poll_interval: Self::DEFAULT_POLL_INTERVAL, realtime: true }
    }
}

/// Optimistic interaction cache.
///
/// Holds sessions, follow state and comment threads in a [`StateStore`],
/// applies user actions locally before the server answers, and keeps the
/// feed fresh with a background poll while realtime is on and the app is
/// in the foreground.
///
/// Lifecycle: [`LiveCache::new`] → [`LiveCache::init`] (inside a tokio
/// runtime) → operations → [`LiveCache::dispose`].
pub struct LiveCache {
    store: Arc<StateStore>,
    api: Arc<dyn SocialApi>,
    seq: FeedSequencer,
    poller: Mutex<Option<Arc<Poller>>>,
    config: CacheConfig,
}

impl LiveCache {
    pub fn new(api: Arc<dyn SocialApi>, config: CacheConfig) -> Arc<Self> {
        Arc::new(Self {
            store: Arc::new(StateStore::new()),
            api,
            seq: FeedSequencer::new(),
            poller: Mutex::new(None),
            config,
        })
    }

    /// Seed initial state and start the poller. Calling twice is a no-op.
    pub fn init(self: &Arc<Self>) {
        if self.poller.lock().unwrap_or_else(PoisonError::into_inner).is_some() {
            return;
        }

        // Subscribers run inside `set`; the poller lock must not be held.
        let realtime = RealtimeState { enabled: self.config.realtime, foreground: true };
        self.store.set(RealtimeState::PATH, realtime);
        self.store.set(AuthState::PATH, AuthState::unknown());
        self.store.set(AppRoute::PATH, AppRoute("/".into()));

        let mut poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if poller.is_some() {
            return;
        }
        let weak = Arc::downgrade(self);
        *poller = Some(Arc::new(Poller::start(self.config.poll_interval, realtime.polling(), move || {
            let weak = weak.clone();
            async move {
                if let Some(cache) = weak.upgrade() {
                    cache.background_refresh().await;
                }
            }
        })));
        info!(
            "live cache initialized (poll_interval={:?}, realtime={})",
            self.config.poll_interval, self.config.realtime
        );
    }

    /// Stop polling and drop every cached entry.
    pub fn dispose(&self) {
        if let Some(poller) = self.poller.lock().unwrap_or_else(PoisonError::into_inner).take() {
            poller.stop();
        }
        self.store.clear();
        info!("live cache disposed");
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    // ── Polling ──

    /// Host lifecycle hook. Returning to the foreground refreshes at once.
    pub fn set_foreground(&self, foreground: bool) {
        self.update_realtime(|r| r.foreground = foreground);
    }

    /// Realtime switch. Turning it on refreshes at once.
    pub fn set_realtime(&self, enabled: bool) {
        self.update_realtime(|r| r.enabled = enabled);
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|p| p.is_active())
    }

    fn update_realtime(&self, f: impl FnOnce(&mut RealtimeState)) {
        let polling = self.store.update::<RealtimeState, _, _>(RealtimeState::PATH, |r| {
            f(r);
            r.polling()
        });
        let Some(polling) = polling else {
            debug!("realtime change before init ignored");
            return;
        };
        if let Some(poller) = self.poller.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            poller.set_active(polling);
        }
    }

    /// One poll tick. Failures are logged, never returned.
    pub async fn background_refresh(&self) {
        if let Err(e) = feed_handlers::handle_refresh(&self.store, &*self.api, &self.seq).await {
            warn!("background refresh failed: {e}");
            self.on_error(&e);
        }
    }

    /// Run a refresh now unless one is already in flight. Returns whether
    /// it ran.
    pub async fn refresh_now(&self) -> bool {
        let poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner).clone();
        match poller {
            Some(poller) => poller.run_now().await,
            None => false,
        }
    }

    // ── Feed ──

    pub async fn load_feed(&self, query: FeedQuery) -> Result<(), CacheError> {
        self.route(feed_handlers::handle_load(&self.store, &*self.api, &self.seq, query).await)
    }

    /// Server search; a blank query restores the last category.
    pub async fn search(&self, text: &str) -> Result<(), CacheError> {
        self.route(feed_handlers::handle_search(&self.store, &*self.api, &self.seq, text).await)
    }

    /// Fetch one session into the feed so it can be interacted with.
    pub async fn track_session(&self, session_id: &str) -> Result<Session, CacheError> {
        self.route(feed_handlers::handle_track(&self.store, &*self.api, session_id).await)
    }

    // ── Interactions ──

    pub async fn toggle_like(&self, session_id: &str) -> Result<bool, CacheError> {
        self.route(
            session_handlers::handle_toggle(&self.store, &*self.api, Interaction::Like, session_id)
                .await,
        )
    }

    pub async fn toggle_book(&self, session_id: &str) -> Result<bool, CacheError> {
        self.route(
            session_handlers::handle_toggle(&self.store, &*self.api, Interaction::Book, session_id)
                .await,
        )
    }

    pub async fn toggle_follow(&self, user_id: &str) -> Result<FollowCounts, CacheError> {
        self.route(follow_handlers::handle_toggle_follow(&self.store, &*self.api, user_id).await)
    }

    pub async fn add_comment(
        &self,
        session_id: &str,
        message: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, CacheError> {
        self.route(
            session_handlers::handle_add_comment(
                &self.store,
                &*self.api,
                session_id,
                message,
                parent_id,
            )
            .await,
        )
    }

    pub async fn load_comments(&self, session_id: &str) -> Result<Vec<Comment>, CacheError> {
        self.route(session_handlers::handle_load_comments(&self.store, &*self.api, session_id).await)
    }

    pub async fn load_profile(&self, user_id: &str) -> Result<User, CacheError> {
        self.route(follow_handlers::handle_load_profile(&self.store, &*self.api, user_id).await)
    }

    // ── Session lifecycle ──

    pub async fn create_session(&self, form: &NewSession) -> Result<Session, CacheError> {
        self.route(session_handlers::handle_create(&self.store, &*self.api, form).await)
    }

    pub async fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<Session, CacheError> {
        self.route(
            session_handlers::handle_update_status(&self.store, &*self.api, session_id, status)
                .await,
        )
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), CacheError> {
        self.route(session_handlers::handle_delete(&self.store, &*self.api, session_id).await)
    }

    // ── Auth ──

    pub async fn login(&self, email: &str, password: &str) -> Result<User, CacheError> {
        self.route(auth_handlers::handle_login(&self.store, &*self.api, email, password).await)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, CacheError> {
        self.route(auth_handlers::handle_register(&self.store, &*self.api, req).await)
    }

    pub async fn logout(&self) -> Result<(), CacheError> {
        self.route(auth_handlers::handle_logout(&self.store, &*self.api).await)
    }

    pub async fn load_own_profile(&self) -> Result<User, CacheError> {
        self.route(auth_handlers::handle_load_own_profile(&self.store, &*self.api).await)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, CacheError> {
        self.route(auth_handlers::handle_update_profile(&self.store, &*self.api, update).await)
    }

    // ── Errors ──

    /// Central error hook. A rejected token signs the user out and routes
    /// to `/login`; cached content is left alone.
    pub fn on_error(&self, err: &CacheError) {
        if let CacheError::Api(api) = err {
            if api.is_unauthorized() {
                auth_handlers::handle_unauthorized(&self.store, &api.to_string());
            }
        }
    }

    fn route<T>(&self, result: Result<T, CacheError>) -> Result<T, CacheError> {
        if let Err(e) = &result {
            self.on_error(e);
        }
        result
    }

    // ── Reads ──

    pub fn feed(&self) -> SessionFeed {
        helpers::feed(&self.store)
    }

    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.feed().find(session_id).cloned()
    }

    pub fn follow_state(&self, user_id: &str) -> Option<FollowState> {
        self.store.get_as::<FollowState>(&FollowState::path(user_id))
    }

    pub fn comments(&self, session_id: &str) -> Option<CommentList> {
        self.store.get_as::<CommentList>(&CommentList::path(session_id))
    }

    pub fn auth(&self) -> AuthState {
        helpers::auth(&self.store)
    }

    pub fn route_path(&self) -> Option<String> {
        self.store.get_as::<AppRoute>(AppRoute::PATH).map(|r| r.0)
    }
}

impl Drop for LiveCache {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            poller.stop();
        }
    }
}
