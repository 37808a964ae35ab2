//! Stagecast client cache.
//!
//! Optimistic interaction cache for the session feed: likes, bookings,
//! follows and comments are applied locally first and reconciled with the
//! server afterwards. A background poll replaces the feed wholesale while
//! realtime is on and the app is in the foreground.
//!
//! State lives in a [`stagecast_flux::StateStore`] at well-known paths:
//!
//! | Path | Type |
//! |------|------|
//! | `sessions/feed` | [`SessionFeed`] |
//! | `sessions/comments/{id}` | [`CommentList`] |
//! | `follow/{user_id}` | [`FollowState`] |
//! | `auth/state` | [`AuthState`] |
//! | `app/route` | [`AppRoute`] |
//! | `app/realtime` | [`RealtimeState`] |

pub mod cache;
pub mod error;
pub mod handlers;
pub mod state;

pub use cache::{CacheConfig, LiveCache};
pub use error::CacheError;
pub use state::*;
