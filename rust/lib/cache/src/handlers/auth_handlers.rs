//! Auth handler implementations.

use stagecast_client::{ProfileUpdate, RegisterRequest, SocialApi, User};
use stagecast_flux::StateStore;
use tracing::info;

use crate::error::CacheError;
use crate::state::*;

/// Handle `auth/login`. The client persists the token; this only moves
/// the auth state and route.
pub async fn handle_login(
    store: &StateStore,
    api: &dyn SocialApi,
    email: &str,
    password: &str,
) -> Result<User, CacheError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(CacheError::validation("Email and password are required"));
    }

    set_busy(store);
    let result = api.login(email, password).await;
    finish_sign_in(store, result.map(|auth| auth.user))
}

/// Handle `auth/register`.
pub async fn handle_register(
    store: &StateStore,
    api: &dyn SocialApi,
    req: &RegisterRequest,
) -> Result<User, CacheError> {
    if req.username.trim().is_empty() {
        return Err(CacheError::validation("Username is required"));
    }
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(CacheError::validation("Email and password are required"));
    }

    set_busy(store);
    let result = api.register(req).await;
    finish_sign_in(store, result.map(|auth| auth.user))
}

/// Handle `auth/logout`: forget the token and every cached entry that
/// belongs to the signed-in user.
pub async fn handle_logout(store: &StateStore, api: &dyn SocialApi) -> Result<(), CacheError> {
    api.logout().await?;
    store.remove(SessionFeed::PATH);
    store.remove_prefix(CommentList::PREFIX);
    store.remove_prefix(FollowState::PREFIX);
    store.set(AuthState::PATH, AuthState::signed_out(None));
    store.set(AppRoute::PATH, AppRoute("/login".into()));
    info!("signed out");
    Ok(())
}

/// Handle `auth/profile`: check the stored token by loading the own
/// profile.
pub async fn handle_load_own_profile(
    store: &StateStore,
    api: &dyn SocialApi,
) -> Result<User, CacheError> {
    let user = api.profile().await?;
    store.set(AuthState::PATH, AuthState::signed_in(user.clone()));
    Ok(user)
}

/// Handle `auth/update-profile`.
pub async fn handle_update_profile(
    store: &StateStore,
    api: &dyn SocialApi,
    update: &ProfileUpdate,
) -> Result<User, CacheError> {
    let user = api.update_profile(update).await?;
    store.set(AuthState::PATH, AuthState::signed_in(user.clone()));
    Ok(user)
}

/// Credentials were rejected: sign out and send the UI to `/login`.
/// Cached sessions stay so the screen behind the login prompt is intact.
pub fn handle_unauthorized(store: &StateStore, message: &str) {
    store.set(AuthState::PATH, AuthState::signed_out(Some(message.to_string())));
    store.set(AppRoute::PATH, AppRoute("/login".into()));
    info!("credentials rejected, routed to /login");
}

fn set_busy(store: &StateStore) {
    store.set(AuthState::PATH, AuthState {
        phase: AuthPhase::Unauthenticated,
        user: None,
        busy: true,
        error: None,
    });
}

fn finish_sign_in(
    store: &StateStore,
    result: Result<User, stagecast_client::ApiError>,
) -> Result<User, CacheError> {
    match result {
        Ok(user) => {
            info!(user_id = %user.id, "signed in");
            store.set(AuthState::PATH, AuthState::signed_in(user.clone()));
            store.set(AppRoute::PATH, AppRoute("/home".into()));
            Ok(user)
        }
        Err(e) => {
            store.set(AuthState::PATH, AuthState::signed_out(Some(e.to_string())));
            Err(e.into())
        }
    }
}
