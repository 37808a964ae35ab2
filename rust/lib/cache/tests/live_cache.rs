//! LiveCache against an in-process fake backend.
//!
//! The fake can hold a call open on a gate so tests can look at the
//! optimistic state while the request is still in flight.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stagecast_cache::*;
use stagecast_client::*;
use tokio::sync::{Notify, oneshot};

// ── Fake backend ──

#[derive(Default)]
struct FakeApi {
    sessions: Mutex<Vec<Session>>,
    search_results: Mutex<HashMap<String, Vec<Session>>>,
    users: Mutex<HashMap<String, User>>,
    comments: Mutex<Vec<Comment>>,
    /// Next write call fails with this error.
    fail_next: Mutex<Option<ApiError>>,
    /// Next list call fails with this error.
    fail_next_list: Mutex<Option<ApiError>>,
    /// Flag the server reports back instead of echoing the request.
    server_flag: Mutex<Option<bool>>,
    /// Next interaction call waits on this.
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    entered: Notify,
    /// List calls wait on these, one per call, in order.
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    list_entered: Notify,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn with_sessions(sessions: Vec<Session>) -> Arc<Self> {
        let api = Self::default();
        *api.sessions.lock().unwrap() = sessions;
        Arc::new(api)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(rx) = gate {
            self.entered.notify_one();
            let _ = rx.await;
        }
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn flag(&self, requested: bool) -> bool {
        self.server_flag.lock().unwrap().unwrap_or(requested)
    }
}

fn boom() -> ApiError {
    ApiError::Server { status: 500, message: "boom".into() }
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<Session>, ApiError> {
        let label = match (&query.search, query.status) {
            (Some(q), _) => format!("search:{q}"),
            (None, Some(status)) => format!("list:{status}"),
            (None, None) => "list".to_string(),
        };
        self.record(label);
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(rx) = gate {
            self.list_entered.notify_one();
            let _ = rx.await;
        }
        if let Some(err) = self.fail_next_list.lock().unwrap().take() {
            return Err(err);
        }
        if let Some(q) = &query.search {
            return Ok(self.search_results.lock().unwrap().get(q).cloned().unwrap_or_default());
        }
        let sessions = self.sessions.lock().unwrap().clone();
        Ok(sessions
            .into_iter()
            .filter(|s| query.status.is_none_or(|st| s.status == st))
            .collect())
    }

    async fn get_session(&self, id: &str) -> Result<Session, ApiError> {
        self.record(format!("get:{id}"));
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Server { status: 404, message: "Session not found".into() })
    }

    async fn create_session(&self, form: &NewSession) -> Result<Session, ApiError> {
        self.record("create");
        self.take_failure()?;
        Ok(Session::new("new1", form.title.clone()))
    }

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
    ) -> Result<Session, ApiError> {
        self.record(format!("status:{id}:{status}"));
        self.take_failure()?;
        let mut s = self.get_session(id).await?;
        s.status = status;
        Ok(s)
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete:{id}"));
        self.take_failure()
    }

    async fn set_like(&self, session_id: &str, liked: bool) -> Result<bool, ApiError> {
        self.record(format!("like:{session_id}:{liked}"));
        self.pass_gate().await;
        self.take_failure()?;
        Ok(self.flag(liked))
    }

    async fn set_booking(&self, session_id: &str, booked: bool) -> Result<bool, ApiError> {
        self.record(format!("book:{session_id}:{booked}"));
        self.pass_gate().await;
        self.take_failure()?;
        Ok(self.flag(booked))
    }

    async fn add_comment(
        &self,
        session_id: &str,
        message: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, ApiError> {
        self.record(format!("comment:{session_id}"));
        self.pass_gate().await;
        self.take_failure()?;
        Ok(Comment {
            id: "c-new".into(),
            session_id: Some(session_id.into()),
            parent_id: parent_id.map(String::from),
            message: message.into(),
            user: None,
            created_at: None,
        })
    }

    async fn list_comments(&self, session_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.record(format!("comments:{session_id}"));
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.record(format!("user:{user_id}"));
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| ApiError::Server { status: 404, message: "User not found".into() })
    }

    async fn set_follow(&self, user_id: &str, follow: bool) -> Result<FollowCounts, ApiError> {
        self.record(format!("follow:{user_id}:{follow}"));
        self.pass_gate().await;
        self.take_failure()?;
        let base = self.users.lock().unwrap().get(user_id).cloned().unwrap_or_default();
        Ok(FollowCounts {
            followers_count: if follow { base.followers_count + 1 } else { base.followers_count },
            following_count: base.following_count,
            is_following: Some(follow),
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.record(format!("login:{email}"));
        if password != "pw" {
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Ok(AuthResponse { token: "jwt".into(), user: me() })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("register:{}", req.username));
        Ok(AuthResponse { token: "jwt".into(), user: me() })
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.record("profile");
        self.take_failure()?;
        Ok(me())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.record("update-profile");
        let mut user = me();
        user.bio = update.bio.clone();
        Ok(user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        Ok(())
    }
}

fn me() -> User {
    User { id: "me".into(), username: "ada".into(), following_count: 4, ..Default::default() }
}

fn session(id: &str, likes: u32, liked: bool) -> Session {
    let mut s = Session::new(id, format!("Session {id}"));
    s.likes_count = likes;
    s.is_liked = liked;
    s.user.id = "u7".into();
    s
}

async fn loaded(sessions: Vec<Session>) -> (Arc<FakeApi>, Arc<LiveCache>) {
    let api = FakeApi::with_sessions(sessions);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());
    cache.load_feed(FeedQuery::default()).await.unwrap();
    api.calls.lock().unwrap().clear();
    (api, cache)
}

fn likes(cache: &LiveCache, id: &str) -> (bool, u32) {
    let s = cache.session(id).unwrap();
    (s.is_liked, s.likes_count)
}

// ── Toggles ──

#[tokio::test]
async fn failed_like_restores_exact_snapshot() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;

    let release = api.hold_next();
    let task = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle_like("s1").await }
    });
    api.entered.notified().await;

    // Optimistic state is visible while the request is in flight.
    assert_eq!(likes(&cache, "s1"), (true, 11));

    api.fail_next(boom());
    release.send(()).unwrap();
    let err = task.await.unwrap().unwrap_err();

    assert!(matches!(err, CacheError::Api(ApiError::Server { status: 500, .. })));
    assert_eq!(likes(&cache, "s1"), (false, 10));
    assert_eq!(api.calls(), vec!["like:s1:true"]);
}

#[tokio::test]
async fn confirmed_booking_keeps_optimistic_values() {
    let mut s = session("s2", 0, false);
    s.bookings_count = 3;
    let (api, cache) = loaded(vec![s]).await;

    assert!(cache.toggle_book("s2").await.unwrap());

    let s = cache.session("s2").unwrap();
    assert!(s.is_booked);
    assert_eq!(s.bookings_count, 4);
    assert_eq!(api.calls(), vec!["book:s2:true"]);
}

#[tokio::test]
async fn server_flag_wins_when_it_disagrees() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;
    *api.server_flag.lock().unwrap() = Some(false);

    assert!(!cache.toggle_like("s1").await.unwrap());
    assert_eq!(likes(&cache, "s1"), (false, 10));
}

#[tokio::test]
async fn double_toggle_nets_zero() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;

    cache.toggle_like("s1").await.unwrap();
    assert_eq!(likes(&cache, "s1"), (true, 11));
    cache.toggle_like("s1").await.unwrap();
    assert_eq!(likes(&cache, "s1"), (false, 10));
    assert_eq!(api.calls(), vec!["like:s1:true", "like:s1:false"]);
}

#[tokio::test]
async fn unlike_at_zero_clamps() {
    let (_api, cache) = loaded(vec![session("s1", 0, true)]).await;

    cache.toggle_like("s1").await.unwrap();
    assert_eq!(likes(&cache, "s1"), (false, 0));
}

#[tokio::test]
async fn toggle_unknown_session_skips_network() {
    let (api, cache) = loaded(vec![]).await;

    let err = cache.toggle_like("nope").await.unwrap_err();
    assert!(matches!(err, CacheError::NotFound(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn overlapping_toggles_roll_back_to_their_own_snapshot() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;

    let release = api.hold_next();
    let first = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle_like("s1").await }
    });
    api.entered.notified().await;
    assert_eq!(likes(&cache, "s1"), (true, 11));

    // Second tap while the first is still in flight.
    assert!(!cache.toggle_like("s1").await.unwrap());
    assert_eq!(likes(&cache, "s1"), (false, 10));

    api.fail_next(boom());
    release.send(()).unwrap();
    assert!(first.await.unwrap().is_err());

    assert_eq!(likes(&cache, "s1"), (false, 10));
}

#[tokio::test]
async fn rollback_skips_session_removed_meanwhile() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;

    let release = api.hold_next();
    let task = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle_like("s1").await }
    });
    api.entered.notified().await;

    api.sessions.lock().unwrap().clear();
    cache.load_feed(FeedQuery::default()).await.unwrap();

    api.fail_next(boom());
    release.send(()).unwrap();
    assert!(task.await.unwrap().is_err());
    assert!(cache.session("s1").is_none());
}

// ── Comments ──

#[tokio::test]
async fn blank_comment_is_rejected_locally() {
    let (api, cache) = loaded(vec![session("s1", 0, false)]).await;

    let err = cache.add_comment("s1", "   ", None).await.unwrap_err();
    assert!(matches!(err, CacheError::Validation(_)));
    assert_eq!(cache.session("s1").unwrap().comments_count, 0);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn comment_appends_to_loaded_thread() {
    let (_api, cache) = loaded(vec![session("s1", 0, false)]).await;
    cache.load_comments("s1").await.unwrap();

    let c = cache.add_comment("s1", "  great show ", Some("c0")).await.unwrap();
    assert_eq!(c.message, "great show");

    assert_eq!(cache.session("s1").unwrap().comments_count, 1);
    let thread = cache.comments("s1").unwrap();
    assert_eq!(thread.items.len(), 1);
    assert_eq!(thread.items[0].parent_id.as_deref(), Some("c0"));
}

#[tokio::test]
async fn comment_leaves_unloaded_thread_alone() {
    let (_api, cache) = loaded(vec![session("s1", 0, false)]).await;

    cache.add_comment("s1", "hi", None).await.unwrap();
    assert!(cache.comments("s1").is_none());
}

#[tokio::test]
async fn failed_comment_restores_count() {
    let mut s = session("s1", 0, false);
    s.comments_count = 5;
    let (api, cache) = loaded(vec![s]).await;

    let release = api.hold_next();
    let task = tokio::spawn({
        let cache = cache.clone();
        async move { cache.add_comment("s1", "hi", None).await }
    });
    api.entered.notified().await;
    assert_eq!(cache.session("s1").unwrap().comments_count, 6);

    api.fail_next(boom());
    release.send(()).unwrap();
    assert!(task.await.unwrap().is_err());
    assert_eq!(cache.session("s1").unwrap().comments_count, 5);
}

// ── Feed, search, polling ──

#[tokio::test]
async fn search_then_clear_reloads_category() {
    let api = FakeApi::with_sessions(vec![
        {
            let mut s = session("s1", 0, false);
            s.status = SessionStatus::Live;
            s
        },
        session("s2", 0, false),
    ]);
    api.search_results.lock().unwrap().insert("music".into(), vec![session("s3", 0, false)]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());

    let live = FeedQuery { status: Some(SessionStatus::Live), ..Default::default() };
    cache.load_feed(live.clone()).await.unwrap();
    assert_eq!(ids(&cache), vec!["s1"]);

    cache.search("music").await.unwrap();
    assert_eq!(ids(&cache), vec!["s3"]);
    assert_eq!(cache.feed().view, FeedView::Search("music".into()));

    cache.search("   ").await.unwrap();
    assert_eq!(ids(&cache), vec!["s1"]);
    assert_eq!(cache.feed().view, FeedView::Category);
    assert_eq!(cache.feed().category, live);

    assert_eq!(api.calls(), vec!["list:live", "search:music", "list:live"]);
}

#[tokio::test]
async fn slow_load_never_overwrites_newer_one() {
    let api = FakeApi::with_sessions(vec![session("s1", 0, false)]);
    api.search_results.lock().unwrap().insert("music".into(), vec![session("s3", 0, false)]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());

    let release = api.hold_next_list();
    let slow = tokio::spawn({
        let cache = cache.clone();
        async move { cache.load_feed(FeedQuery::default()).await }
    });
    api.list_entered.notified().await;

    cache.search("music").await.unwrap();
    release.send(()).unwrap();
    slow.await.unwrap().unwrap();

    assert_eq!(ids(&cache), vec!["s3"]);
    assert!(!cache.feed().loading);
}

#[tokio::test]
async fn track_session_makes_it_toggleable() {
    let api = FakeApi::with_sessions(vec![session("s1", 2, false)]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());
    let live = FeedQuery { status: Some(SessionStatus::Live), ..Default::default() };
    cache.load_feed(live).await.unwrap();
    assert!(matches!(cache.toggle_like("s1").await, Err(CacheError::NotFound(_))));

    cache.track_session("s1").await.unwrap();
    cache.track_session("s1").await.unwrap();
    assert_eq!(ids(&cache), vec!["s1"]);

    cache.toggle_like("s1").await.unwrap();
    assert_eq!(likes(&cache, "s1"), (true, 3));
}

#[tokio::test(start_paused = true)]
async fn polling_replaces_feed_while_foreground() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;
    cache.init();

    *api.sessions.lock().unwrap() = vec![session("s1", 99, true), session("s2", 0, false)];
    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;

    assert_eq!(ids(&cache), vec!["s1", "s2"]);
    assert_eq!(likes(&cache, "s1"), (true, 99));
    cache.dispose();
}

#[tokio::test(start_paused = true)]
async fn background_suspends_and_foreground_refreshes_at_once() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;
    cache.init();

    cache.set_foreground(false);
    assert!(!cache.is_polling());
    *api.sessions.lock().unwrap() = vec![session("s1", 50, false)];
    tokio::time::sleep(Duration::from_secs(95)).await;
    settle().await;
    assert_eq!(likes(&cache, "s1"), (false, 10));
    assert!(api.calls().is_empty());

    cache.set_foreground(true);
    settle().await;
    assert_eq!(likes(&cache, "s1"), (false, 50));
    assert_eq!(api.calls(), vec!["list"]);
    cache.dispose();
}

#[tokio::test(start_paused = true)]
async fn realtime_off_disables_polling() {
    let api = FakeApi::with_sessions(vec![session("s1", 1, false)]);
    let cache = LiveCache::new(api.clone(), CacheConfig { realtime: false, ..Default::default() });
    cache.init();
    cache.load_feed(FeedQuery::default()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;
    assert_eq!(api.calls(), vec!["list"]);

    cache.set_realtime(true);
    settle().await;
    assert_eq!(api.calls(), vec!["list", "list"]);
    cache.dispose();
}

#[tokio::test(start_paused = true)]
async fn refresh_in_flight_skips_tick() {
    let (api, cache) = loaded(vec![session("s1", 1, false)]).await;
    cache.init();

    let release = api.hold_next_list();
    tokio::time::sleep(Duration::from_secs(31)).await;
    api.list_entered.notified().await;

    assert!(!cache.refresh_now().await);
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(api.calls(), vec!["list"]);

    release.send(()).unwrap();
    settle().await;
    cache.dispose();
}

#[tokio::test(start_paused = true)]
async fn failed_tick_keeps_feed_and_route() {
    let (api, cache) = loaded(vec![session("s1", 3, false)]).await;
    cache.init();

    *api.fail_next_list.lock().unwrap() = Some(boom());
    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;

    assert_eq!(api.calls(), vec!["list"]);
    let feed = cache.feed();
    assert_eq!(ids(&cache), vec!["s1"]);
    assert_eq!(feed.error, None);
    assert!(!feed.refreshing && !feed.loading);
    assert_eq!(cache.route_path().as_deref(), Some("/"));
    cache.dispose();
}

#[tokio::test]
async fn tick_during_foreground_load_is_skipped() {
    let mut live = session("s2", 0, false);
    live.status = SessionStatus::Live;
    let (api, cache) = loaded(vec![session("s1", 0, false), live]).await;

    let release = api.hold_next_list();
    let load = tokio::spawn({
        let cache = cache.clone();
        async move {
            let query = FeedQuery { status: Some(SessionStatus::Live), ..Default::default() };
            cache.load_feed(query).await
        }
    });
    api.list_entered.notified().await;

    *api.fail_next_list.lock().unwrap() = Some(boom());
    cache.background_refresh().await;
    assert!(api.fail_next_list.lock().unwrap().take().is_some());
    assert_eq!(api.calls(), vec!["list:live"]);

    release.send(()).unwrap();
    load.await.unwrap().unwrap();

    let feed = cache.feed();
    assert_eq!(ids(&cache), vec!["s2"]);
    assert_eq!(feed.category.status, Some(SessionStatus::Live));
    assert_eq!(feed.error, None);
    assert!(!feed.loading && !feed.refreshing);
}

#[tokio::test]
async fn init_subscribers_may_query_the_cache() {
    let (_api, cache) = loaded(vec![]).await;
    let seen = Arc::new(Mutex::new(None));
    let weak = Arc::downgrade(&cache);
    let out = seen.clone();
    cache.store().subscribe(RealtimeState::PATH, move |_, _| {
        if let Some(cache) = weak.upgrade() {
            *out.lock().unwrap() = Some(cache.is_polling());
        }
    });

    cache.init();
    assert_eq!(*seen.lock().unwrap(), Some(false));
    assert!(cache.is_polling());
    cache.dispose();
}

#[tokio::test]
async fn dispose_clears_state() {
    let (_api, cache) = loaded(vec![session("s1", 1, false)]).await;
    cache.init();
    assert!(cache.is_polling());

    cache.dispose();
    assert!(!cache.is_polling());
    assert!(cache.store().is_empty());
    assert!(cache.session("s1").is_none());
}

// ── Follow ──

fn seed_user(api: &FakeApi) {
    api.users.lock().unwrap().insert("u7".into(), User {
        id: "u7".into(),
        username: "grace".into(),
        followers_count: 10,
        following_count: 2,
        is_following: Some(false),
        ..Default::default()
    });
}

#[tokio::test]
async fn follow_uses_server_counts() {
    let (api, cache) = loaded(vec![session("s1", 0, false)]).await;
    seed_user(&api);
    cache.login("ada@example.com", "pw").await.unwrap();
    cache.load_profile("u7").await.unwrap();

    let counts = cache.toggle_follow("u7").await.unwrap();
    assert_eq!(counts.followers_count, 11);

    let f = cache.follow_state("u7").unwrap();
    assert!(f.is_following);
    assert_eq!((f.follower_count, f.following_count), (11, 2));
    assert!(!f.busy);
    assert_eq!(cache.session("s1").unwrap().user.is_following, Some(true));
    assert_eq!(cache.auth().user.unwrap().following_count, 5);
}

#[tokio::test]
async fn failed_follow_restores_snapshot() {
    let (api, cache) = loaded(vec![]).await;
    seed_user(&api);
    cache.load_profile("u7").await.unwrap();
    let before = cache.follow_state("u7").unwrap();

    let release = api.hold_next();
    let task = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle_follow("u7").await }
    });
    api.entered.notified().await;
    let mid = cache.follow_state("u7").unwrap();
    assert!(mid.is_following && mid.busy);
    assert_eq!(mid.follower_count, 11);

    api.fail_next(boom());
    release.send(()).unwrap();
    assert!(task.await.unwrap().is_err());
    assert_eq!(cache.follow_state("u7").unwrap(), before);
}

#[tokio::test]
async fn follow_rollback_after_logout_stays_cleared() {
    let (api, cache) = loaded(vec![]).await;
    seed_user(&api);
    cache.load_profile("u7").await.unwrap();

    let release = api.hold_next();
    let task = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle_follow("u7").await }
    });
    api.entered.notified().await;

    cache.logout().await.unwrap();
    api.fail_next(boom());
    release.send(()).unwrap();
    assert!(task.await.unwrap().is_err());
    assert!(cache.follow_state("u7").is_none());
}

#[tokio::test]
async fn follow_requires_loaded_profile() {
    let (api, cache) = loaded(vec![]).await;
    assert!(matches!(cache.toggle_follow("u7").await, Err(CacheError::NotFound(_))));
    assert!(api.calls().is_empty());
}

// ── Session lifecycle ──

#[tokio::test]
async fn invalid_status_transition_is_local() {
    let mut s = session("s1", 0, false);
    s.status = SessionStatus::Ended;
    let (api, cache) = loaded(vec![s]).await;

    let err = cache.update_status("s1", SessionStatus::Live).await.unwrap_err();
    assert!(matches!(err, CacheError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn status_update_replaces_entry() {
    let (api, cache) = loaded(vec![session("s1", 0, false)]).await;

    cache.update_status("s1", SessionStatus::Live).await.unwrap();
    assert_eq!(cache.session("s1").unwrap().status, SessionStatus::Live);
    assert_eq!(api.calls(), vec!["status:s1:live"]);
}

#[tokio::test]
async fn create_validates_then_prepends() {
    let (api, cache) = loaded(vec![session("s1", 0, false)]).await;

    let bad = NewSession { kind: NewSession::KIND_EVENT.into(), title: "Gig".into(), ..Default::default() };
    assert!(matches!(cache.create_session(&bad).await, Err(CacheError::Validation(_))));
    assert!(api.calls().is_empty());

    let good = NewSession { kind: NewSession::KIND_POST.into(), title: "Hello".into(), ..Default::default() };
    cache.create_session(&good).await.unwrap();
    assert_eq!(ids(&cache), vec!["new1", "s1"]);
}

#[tokio::test]
async fn delete_drops_session_and_thread() {
    let (_api, cache) = loaded(vec![session("s1", 0, false)]).await;
    cache.load_comments("s1").await.unwrap();

    cache.delete_session("s1").await.unwrap();
    assert!(cache.session("s1").is_none());
    assert!(cache.comments("s1").is_none());
}

// ── Auth ──

#[tokio::test]
async fn login_routes_home() {
    let api = FakeApi::with_sessions(vec![]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());

    let user = cache.login("ada@example.com", "pw").await.unwrap();
    assert_eq!(user.id, "me");
    assert_eq!(cache.auth().phase, AuthPhase::Authenticated);
    assert_eq!(cache.route_path().as_deref(), Some("/home"));
}

#[tokio::test]
async fn login_requires_credentials() {
    let api = FakeApi::with_sessions(vec![]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());

    assert!(matches!(cache.login(" ", "pw").await, Err(CacheError::Validation(_))));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn unauthorized_routes_to_login_and_keeps_cache() {
    let (api, cache) = loaded(vec![session("s1", 10, false)]).await;
    cache.login("ada@example.com", "pw").await.unwrap();

    api.fail_next(ApiError::Unauthorized("Token expired".into()));
    let err = cache.toggle_like("s1").await.unwrap_err();

    assert!(err.is_unauthorized());
    let auth = cache.auth();
    assert_eq!(auth.phase, AuthPhase::Unauthenticated);
    assert_eq!(auth.error.as_deref(), Some("unauthenticated: Token expired"));
    assert_eq!(cache.route_path().as_deref(), Some("/login"));
    assert_eq!(likes(&cache, "s1"), (false, 10));
}

#[tokio::test]
async fn logout_clears_user_data() {
    let (api, cache) = loaded(vec![session("s1", 0, false)]).await;
    seed_user(&api);
    cache.login("ada@example.com", "pw").await.unwrap();
    cache.load_profile("u7").await.unwrap();
    cache.load_comments("s1").await.unwrap();

    cache.logout().await.unwrap();
    assert!(cache.feed().items.is_empty());
    assert!(cache.follow_state("u7").is_none());
    assert!(cache.comments("s1").is_none());
    assert_eq!(cache.auth().phase, AuthPhase::Unauthenticated);
    assert_eq!(cache.route_path().as_deref(), Some("/login"));
}

#[tokio::test]
async fn profile_update_refreshes_auth_state() {
    let api = FakeApi::with_sessions(vec![]);
    let cache = LiveCache::new(api.clone(), CacheConfig::default());
    cache.load_own_profile().await.unwrap();

    let update = ProfileUpdate { bio: Some("hello".into()), ..Default::default() };
    cache.update_profile(&update).await.unwrap();
    assert_eq!(cache.auth().user.unwrap().bio.as_deref(), Some("hello"));
}

// ── Helpers ──

fn ids(cache: &LiveCache) -> Vec<String> {
    cache.feed().items.into_iter().map(|s| s.id).collect()
}

/// Let spawned poll runs finish.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(1)).await;
}
