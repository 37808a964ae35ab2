//! Follow state handlers.

use stagecast_client::{FollowCounts, SocialApi, User};
use stagecast_flux::{StateStore, with_optimistic_update};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::handlers::helpers::{self, Toggle};
use crate::state::*;

/// Handle `user/load`: fetch a profile and seed `follow/{user_id}`.
pub async fn handle_load_profile(
    store: &StateStore,
    api: &dyn SocialApi,
    user_id: &str,
) -> Result<User, CacheError> {
    let user = api.get_user(user_id).await?;
    store.set(&FollowState::path(user_id), FollowState::from_user(&user));
    Ok(user)
}

/// Handle `user/follow`: optimistic follow / unfollow.
///
/// The snapshot is the whole [`FollowState`] so a failure restores both
/// counts. On success the server's counts replace the local ones.
pub async fn handle_toggle_follow(
    store: &StateStore,
    api: &dyn SocialApi,
    user_id: &str,
) -> Result<FollowCounts, CacheError> {
    let path = FollowState::path(user_id);

    let result = with_optimistic_update(
        || {
            store
                .update::<FollowState, _, _>(&path, |f| {
                    let snapshot = f.clone();
                    let next = Toggle { flag: f.is_following, count: f.follower_count }.flipped();
                    f.is_following = next.flag;
                    f.follower_count = next.count;
                    f.busy = true;
                    snapshot
                })
                .ok_or_else(|| CacheError::not_found("user", user_id))
        },
        |snapshot| {
            let wanted = !snapshot.is_following;
            debug!(user_id, wanted, "optimistic follow applied");
            async move { api.set_follow(user_id, wanted).await.map_err(CacheError::from) }
        },
        |snapshot, counts: &FollowCounts| {
            let following = store.update::<FollowState, _, _>(&path, |f| {
                f.is_following = counts.is_following.unwrap_or(f.is_following);
                f.follower_count = counts.followers_count;
                f.following_count = counts.following_count;
                f.busy = false;
                f.is_following
            });
            if let Some(following) = following {
                if following != snapshot.is_following {
                    mirror_follow(store, user_id, following);
                }
            }
        },
        |snapshot| {
            // Skipped when logout or dispose dropped the entry meanwhile.
            store.update::<FollowState, _, _>(&path, |f| *f = FollowState { busy: false, ..snapshot });
        },
    )
    .await;

    if let Err(e) = &result {
        if !matches!(e, CacheError::NotFound(_)) {
            warn!(user_id, "follow rolled back: {e}");
        }
    }
    result
}

/// Copy a confirmed follow change into the feed's embedded owners and
/// the signed-in user's following count.
fn mirror_follow(store: &StateStore, user_id: &str, following: bool) {
    if store.contains(SessionFeed::PATH) {
        store.update::<SessionFeed, _, _>(SessionFeed::PATH, |f| {
            for s in f.items.iter_mut().filter(|s| s.user.id == user_id) {
                s.user.is_following = Some(following);
            }
        });
    }
    if helpers::current_user_id(store).is_some() {
        store.update::<AuthState, _, _>(AuthState::PATH, |a| {
            if let Some(me) = a.user.as_mut() {
                me.following_count = if following {
                    me.following_count.saturating_add(1)
                } else {
                    me.following_count.saturating_sub(1)
                };
            }
        });
    }
}
