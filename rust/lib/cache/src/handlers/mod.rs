//! Handler implementations.
//!
//! Handlers are free functions over a [`StateStore`](stagecast_flux::StateStore)
//! and a [`SocialApi`](stagecast_client::SocialApi). They are the only
//! writers of cache state; [`crate::LiveCache`] wires them together.

pub mod auth_handlers;
pub mod feed_handlers;
pub mod follow_handlers;
pub mod helpers;
pub mod session_handlers;
