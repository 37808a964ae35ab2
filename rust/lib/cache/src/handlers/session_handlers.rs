//! Session interactions and lifecycle.

use stagecast_client::{Comment, NewSession, Session, SessionStatus, SocialApi};
use stagecast_flux::{StateStore, with_optimistic_update};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::handlers::helpers::{self, Interaction};
use crate::state::*;

/// Handle `session/like` and `session/book`.
///
/// Flips the flag and its count in one store update, calls the server,
/// then either settles on the server's flag or restores the snapshot.
/// Returns the server's flag.
pub async fn handle_toggle(
    store: &StateStore,
    api: &dyn SocialApi,
    kind: Interaction,
    session_id: &str,
) -> Result<bool, CacheError> {
    let result = with_optimistic_update(
        || {
            helpers::update_session(store, session_id, |s| {
                let snapshot = kind.read(s);
                kind.write(s, snapshot.flipped());
                snapshot
            })
            .ok_or_else(|| CacheError::not_found("session", session_id))
        },
        |snapshot| {
            let wanted = !snapshot.flag;
            debug!(session_id, interaction = kind.name(), wanted, "optimistic toggle applied");
            async move {
                let confirmed = match kind {
                    Interaction::Like => api.set_like(session_id, wanted).await,
                    Interaction::Book => api.set_booking(session_id, wanted).await,
                };
                confirmed.map_err(CacheError::from)
            }
        },
        |_, &confirmed| {
            helpers::update_session(store, session_id, |s| {
                let settled = kind.read(s).settle(confirmed);
                kind.write(s, settled);
            });
        },
        |snapshot| {
            if helpers::update_session(store, session_id, |s| kind.write(s, snapshot)).is_none() {
                debug!(session_id, "session gone before rollback");
            }
        },
    )
    .await;

    if let Err(e) = &result {
        if !matches!(e, CacheError::NotFound(_)) {
            warn!(session_id, interaction = kind.name(), "toggle rolled back: {e}");
        }
    }
    result
}

/// Handle `session/comment`.
pub async fn handle_add_comment(
    store: &StateStore,
    api: &dyn SocialApi,
    session_id: &str,
    message: &str,
    parent_id: Option<&str>,
) -> Result<Comment, CacheError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CacheError::validation("Comment cannot be empty"));
    }

    let result = with_optimistic_update(
        || -> Result<bool, CacheError> {
            let cached = helpers::update_session(store, session_id, |s| {
                s.comments_count = s.comments_count.saturating_add(1);
            });
            Ok(cached.is_some())
        },
        |_| async move {
            api.add_comment(session_id, message, parent_id).await.map_err(CacheError::from)
        },
        |_, comment: &Comment| {
            let appended = store.update::<CommentList, _, _>(&CommentList::path(session_id), |l| {
                l.items.push(comment.clone());
            });
            debug!(session_id, appended = appended.is_some(), "comment created");
        },
        |cached| {
            if cached {
                helpers::update_session(store, session_id, |s| {
                    s.comments_count = s.comments_count.saturating_sub(1);
                });
            }
        },
    )
    .await;

    if let Err(e) = &result {
        warn!(session_id, "comment rolled back: {e}");
    }
    result
}

/// Handle `session/create`: validate locally, upload, prepend to the feed.
pub async fn handle_create(
    store: &StateStore,
    api: &dyn SocialApi,
    form: &NewSession,
) -> Result<Session, CacheError> {
    form.validate().map_err(CacheError::Validation)?;

    let session = api.create_session(form).await?;
    helpers::ensure_feed(store);
    store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
        f.remove(&session.id);
        f.items.insert(0, session.clone());
    });
    debug!(session_id = %session.id, "session created");
    Ok(session)
}

/// Handle `session/status`. The transition is checked against the cached
/// status before any request goes out.
pub async fn handle_update_status(
    store: &StateStore,
    api: &dyn SocialApi,
    session_id: &str,
    next: SessionStatus,
) -> Result<Session, CacheError> {
    let current = helpers::feed(store)
        .find(session_id)
        .map(|s| s.status)
        .ok_or_else(|| CacheError::not_found("session", session_id))?;
    if !current.can_transition_to(next) {
        return Err(CacheError::Validation(format!(
            "Cannot change status from {current} to {next}"
        )));
    }

    let session = api.update_session_status(session_id, next).await?;
    store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| f.upsert(session.clone()));
    Ok(session)
}

/// Handle `session/delete`.
pub async fn handle_delete(
    store: &StateStore,
    api: &dyn SocialApi,
    session_id: &str,
) -> Result<(), CacheError> {
    api.delete_session(session_id).await?;
    store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
        f.remove(session_id);
    });
    store.remove(&CommentList::path(session_id));
    debug!(session_id, "session deleted");
    Ok(())
}

/// Handle `session/comments`: load the thread into
/// `sessions/comments/{id}`.
pub async fn handle_load_comments(
    store: &StateStore,
    api: &dyn SocialApi,
    session_id: &str,
) -> Result<Vec<Comment>, CacheError> {
    let path = CommentList::path(session_id);
    store.set(&path, CommentList::loading(session_id));

    match api.list_comments(session_id).await {
        Ok(items) => {
            store.set(&path, CommentList {
                session_id: session_id.to_string(),
                items: items.clone(),
                loading: false,
                error: None,
            });
            Ok(items)
        }
        Err(e) => {
            store.set(&path, CommentList {
                session_id: session_id.to_string(),
                items: vec![],
                loading: false,
                error: Some(e.to_string()),
            });
            Err(e.into())
        }
    }
}
