//! Feed loading: category loads, search, background refresh.
//!
//! Every load takes a ticket from the [`FeedSequencer`]. A response whose
//! ticket is no longer the newest is dropped, so whichever load started
//! last decides what the feed shows. Tickets are taken inside the same
//! store update that flips `loading`, and a poll tick never starts while a
//! foreground load is in flight.

use stagecast_client::{Session, SessionQuery, SocialApi};
use stagecast_flux::StateStore;
use tracing::debug;

use crate::error::CacheError;
use crate::handlers::helpers::{self, FeedSequencer};
use crate::state::*;

/// Handle `feed/load`: fetch a category and replace the feed.
pub async fn handle_load(
    store: &StateStore,
    api: &dyn SocialApi,
    seq: &FeedSequencer,
    query: FeedQuery,
) -> Result<(), CacheError> {
    helpers::ensure_feed(store);
    let request = query.to_session_query();
    let ticket = store
        .update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
            f.loading = true;
            f.error = None;
            f.view = FeedView::Category;
            f.category = query;
            seq.begin()
        })
        .unwrap_or_default();
    debug!(ticket, "feed load started");

    let result = api.list_sessions(&request).await;
    apply(store, seq, ticket, result, FeedView::Category, true)
}

/// Handle `feed/search`. A blank query reloads the last category.
pub async fn handle_search(
    store: &StateStore,
    api: &dyn SocialApi,
    seq: &FeedSequencer,
    text: &str,
) -> Result<(), CacheError> {
    let text = text.trim();
    if text.is_empty() {
        let category = helpers::feed(store).category;
        return handle_load(store, api, seq, category).await;
    }

    helpers::ensure_feed(store);
    let view = FeedView::Search(text.to_string());
    let request = search_query(&helpers::feed(store).category, text);
    let ticket = store
        .update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
            f.loading = true;
            f.error = None;
            f.view = view.clone();
            seq.begin()
        })
        .unwrap_or_default();
    debug!(ticket, query = text, "feed search started");

    let result = api.list_sessions(&request).await;
    apply(store, seq, ticket, result, view, true)
}

/// Handle a poll tick: re-fetch whatever the feed currently shows,
/// without the loading spinner. Skipped while a foreground load is in
/// flight; that load already brings the feed up to date.
pub async fn handle_refresh(
    store: &StateStore,
    api: &dyn SocialApi,
    seq: &FeedSequencer,
) -> Result<(), CacheError> {
    let started = store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
        if f.loading {
            return None;
        }
        f.refreshing = true;
        let request = match &f.view {
            FeedView::Category => f.category.to_session_query(),
            FeedView::Search(text) => search_query(&f.category, text),
        };
        Some((seq.begin(), request, f.view.clone()))
    });
    let (ticket, request, view) = match started {
        None => {
            debug!("feed never loaded, nothing to refresh");
            return Ok(());
        }
        Some(None) => {
            debug!("foreground load in flight, refresh skipped");
            return Ok(());
        }
        Some(Some(started)) => started,
    };
    debug!(ticket, "feed refresh started");

    let result = api.list_sessions(&request).await;
    apply(store, seq, ticket, result, view, false)
}

/// Handle `session/track`: fetch one session and upsert it into the feed.
pub async fn handle_track(
    store: &StateStore,
    api: &dyn SocialApi,
    session_id: &str,
) -> Result<Session, CacheError> {
    let session = api.get_session(session_id).await?;
    helpers::ensure_feed(store);
    store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| f.upsert(session.clone()));
    Ok(session)
}

fn search_query(category: &FeedQuery, text: &str) -> SessionQuery {
    SessionQuery { search: Some(text.to_string()), limit: category.limit, ..Default::default() }
}

fn apply(
    store: &StateStore,
    seq: &FeedSequencer,
    ticket: u64,
    result: Result<Vec<Session>, stagecast_client::ApiError>,
    view: FeedView,
    foreground: bool,
) -> Result<(), CacheError> {
    if !seq.is_current(ticket) {
        debug!(ticket, "stale feed response dropped");
        return result.map(|_| ()).map_err(CacheError::from);
    }
    match result {
        Ok(items) => {
            debug!(ticket, count = items.len(), "feed replaced");
            store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
                f.items = items;
                f.view = view;
                f.loading = false;
                f.refreshing = false;
                f.error = None;
            });
            Ok(())
        }
        Err(e) => {
            // Background refresh failures leave the feed as it was.
            let message = foreground.then(|| e.to_string());
            store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
                if message.is_some() {
                    f.error = message;
                    f.loading = false;
                }
                f.refreshing = false;
            });
            Err(e.into())
        }
    }
}
