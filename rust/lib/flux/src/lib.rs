//! Flux: client state engine for Stagecast.
//!
//! Rust owns all client state; the platform shell only renders it and
//! forwards lifecycle signals (foreground/background).
//!
//! # Primitives
//!
//! - [`StateStore`]: path-addressed values with atomic read-modify-write
//!   and pattern subscriptions (`sessions/feed`, `follow/+`, `#`).
//! - [`with_optimistic_update`]: snapshot, apply, await the remote call,
//!   then commit or roll back.
//! - [`Poller`]: cancellable periodic task gated by an active flag, with
//!   an in-flight guard so ticks never overlap.
//!
//! # Example
//!
//! ```ignore
//! use stagecast_flux::StateStore;
//!
//! let store = StateStore::new();
//! store.subscribe("sessions/#", |path, _| println!("{path} changed"));
//! store.set("sessions/feed", feed);
//! store.update("sessions/feed", |feed: &mut SessionFeed| feed.loading = false);
//! ```

pub mod optimistic;
pub mod pattern;
pub mod poller;
pub mod store;
pub mod value;

pub use optimistic::with_optimistic_update;
pub use poller::{BoxFuture, Poller};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
