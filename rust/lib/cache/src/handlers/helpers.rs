//! Shared helpers for handlers.

use std::sync::atomic::{AtomicU64, Ordering};

use stagecast_client::Session;
use stagecast_flux::StateStore;

use crate::state::*;

/// A boolean flag and its paired count, as seen before or after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub flag: bool,
    pub count: u32,
}

impl Toggle {
    /// Negate the flag and move the count by one, never below zero.
    pub fn flipped(self) -> Self {
        if self.flag {
            Toggle { flag: false, count: self.count.saturating_sub(1) }
        } else {
            Toggle { flag: true, count: self.count.saturating_add(1) }
        }
    }

    /// Reconcile with the flag the server reports. Agreement keeps the
    /// count; disagreement moves it one step toward the server's flag.
    pub fn settle(self, server_flag: bool) -> Self {
        if self.flag == server_flag { self } else { self.flipped() }
    }
}

/// Session interactions that toggle a flag/count pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Like,
    Book,
}

impl Interaction {
    pub fn name(self) -> &'static str {
        match self {
            Interaction::Like => "like",
            Interaction::Book => "book",
        }
    }

    pub fn read(self, s: &Session) -> Toggle {
        match self {
            Interaction::Like => Toggle { flag: s.is_liked, count: s.likes_count },
            Interaction::Book => Toggle { flag: s.is_booked, count: s.bookings_count },
        }
    }

    pub fn write(self, s: &mut Session, t: Toggle) {
        match self {
            Interaction::Like => {
                s.is_liked = t.flag;
                s.likes_count = t.count;
            }
            Interaction::Book => {
                s.is_booked = t.flag;
                s.bookings_count = t.count;
            }
        }
    }
}

/// Orders list loads so a slow response never overwrites a newer one.
#[derive(Debug, Default)]
pub struct FeedSequencer {
    latest: AtomicU64,
}

impl FeedSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a load about to start.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether no load has started since `ticket`.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::Acquire) == ticket
    }
}

/// Current feed, or an empty one when nothing has been loaded yet.
pub fn feed(store: &StateStore) -> SessionFeed {
    store.get_as::<SessionFeed>(SessionFeed::PATH).unwrap_or_else(SessionFeed::empty)
}

/// Make sure `sessions/feed` exists so `StateStore::update` has a target.
pub fn ensure_feed(store: &StateStore) {
    if !store.contains(SessionFeed::PATH) {
        store.set(SessionFeed::PATH, SessionFeed::empty());
    }
}

/// Apply `f` to the cached session `id`. `None` when the session is not
/// in the feed.
pub fn update_session<R>(
    store: &StateStore,
    id: &str,
    f: impl FnOnce(&mut Session) -> R,
) -> Option<R> {
    store
        .update::<SessionFeed, _, _>(SessionFeed::PATH, |feed| feed.find_mut(id).map(f))
        .flatten()
}

pub fn auth(store: &StateStore) -> AuthState {
    store.get_as::<AuthState>(AuthState::PATH).unwrap_or_else(AuthState::unknown)
}

pub fn current_user_id(store: &StateStore) -> Option<String> {
    auth(store).user.map(|u| u.id)
}
