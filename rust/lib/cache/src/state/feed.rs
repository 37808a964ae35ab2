//! Session feed: stored at `sessions/feed`.

use stagecast_client::{Session, SessionQuery, SessionStatus};

/// The session list the current screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFeed {
    pub items: Vec<Session>,
    /// Foreground load in progress (spinner).
    pub loading: bool,
    /// Background refresh in progress (no spinner).
    pub refreshing: bool,
    pub error: Option<String>,
    /// What `items` currently holds.
    pub view: FeedView,
    /// Last category load; search falls back to it when cleared.
    pub category: FeedQuery,
}

/// Source of the items in the feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedView {
    #[default]
    Category,
    Search(String),
}

/// Category filters for a feed load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedQuery {
    pub status: Option<SessionStatus>,
    pub genre: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl FeedQuery {
    pub fn to_session_query(&self) -> SessionQuery {
        SessionQuery {
            status: self.status,
            genre: self.genre.clone(),
            page: self.page,
            limit: self.limit,
            user_id: self.user_id.clone(),
            search: None,
        }
    }
}

impl SessionFeed {
    pub const PATH: &'static str = "sessions/feed";

    pub fn empty() -> Self {
        Self {
            items: vec![],
            loading: false,
            refreshing: false,
            error: None,
            view: FeedView::Category,
            category: FeedQuery::default(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Session> {
        self.items.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.items.iter_mut().find(|s| s.id == id)
    }

    /// Replace the entry with the same id, or append.
    pub fn upsert(&mut self, session: Session) {
        match self.find_mut(&session.id) {
            Some(existing) => *existing = session,
            None => self.items.push(session),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let pos = self.items.iter().position(|s| s.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn search_query(&self) -> Option<&str> {
        match &self.view {
            FeedView::Search(q) => Some(q),
            FeedView::Category => None,
        }
    }
}
