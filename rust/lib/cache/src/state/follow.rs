//! Follow relationship for a viewed user: stored at `follow/{user_id}`.
//!
//! Kept apart from session data so every screen showing the same user
//! reads the same values.

use stagecast_client::User;

#[derive(Debug, Clone, PartialEq)]
pub struct FollowState {
    pub user_id: String,
    pub is_following: bool,
    pub follower_count: u32,
    pub following_count: u32,
    /// A follow/unfollow request is in flight.
    pub busy: bool,
}

impl FollowState {
    pub const PREFIX: &'static str = "follow";

    pub fn path(user_id: &str) -> String {
        format!("{}/{}", Self::PREFIX, user_id)
    }

    /// Seed from a fetched profile.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            is_following: user.is_following.unwrap_or(false),
            follower_count: user.followers_count,
            following_count: user.following_count,
            busy: false,
        }
    }
}
