//! State definitions.
//!
//! Each file defines one state type stored at a well-known path. The UI
//! subscribes to these paths; handlers are the only writers.

pub mod app;
pub mod auth;
pub mod comments;
pub mod feed;
pub mod follow;

pub use app::{AppRoute, RealtimeState};
pub use auth::{AuthPhase, AuthState};
pub use comments::CommentList;
pub use feed::{FeedQuery, FeedView, SessionFeed};
pub use follow::FollowState;
