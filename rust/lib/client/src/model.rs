//! Wire types for the Stagecast API.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de;

// ── Session ─────────────────────────────────────────────────────────

/// Lifecycle of a session: `scheduled → live → ended`, or
/// `scheduled → cancelled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Live,
    Ended,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Live => "live",
            SessionStatus::Ended => "ended",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Scheduled, SessionStatus::Live)
                | (SessionStatus::Scheduled, SessionStatus::Cancelled)
                | (SessionStatus::Live, SessionStatus::Ended)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Ended | SessionStatus::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "live" => Ok(SessionStatus::Live),
            "ended" => Ok(SessionStatus::Ended),
            "cancelled" | "canceled" => Ok(SessionStatus::Cancelled),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// Owner summary embedded in a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_following: Option<bool>,
}

/// A post or a scheduled / live event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub likes_count: u32,
    #[serde(default, deserialize_with = "de::count")]
    pub comments_count: u32,
    #[serde(default, deserialize_with = "de::count")]
    pub bookings_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub user: UserSummary,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Minimal session, mostly for tests and seeding.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            caption: None,
            kind: None,
            genre: None,
            status: SessionStatus::default(),
            start_time: None,
            end_time: None,
            poster_url: None,
            video_url: None,
            likes_count: 0,
            comments_count: 0,
            bookings_count: 0,
            is_liked: false,
            is_booked: false,
            user: UserSummary::default(),
            created_at: None,
        }
    }
}

/// Filters for `GET /sessions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl SessionQuery {
    pub fn status(status: SessionStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self { search: Some(text.into()), ..Default::default() }
    }
}

/// Form for `POST /sessions`. Media are read from local files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSession {
    pub title: String,
    pub caption: Option<String>,
    /// `"post"` or `"event"`.
    pub kind: String,
    pub genre: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub poster: Option<PathBuf>,
    pub video: Option<PathBuf>,
}

impl NewSession {
    pub const KIND_POST: &'static str = "post";
    pub const KIND_EVENT: &'static str = "event";

    /// Reject forms the server would refuse, before any upload starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".into());
        }
        match self.kind.as_str() {
            Self::KIND_POST => {}
            Self::KIND_EVENT => {
                let Some(start) = self.start_time else {
                    return Err("Events need a start time".into());
                };
                if let Some(end) = self.end_time {
                    if end <= start {
                        return Err("End time must be after start time".into());
                    }
                }
            }
            other => return Err(format!("Unknown session type '{other}'")),
        }
        Ok(())
    }
}

// ── Interactions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Counts returned by follow / unfollow. `is_following` is only present
/// on newer servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FollowCounts {
    #[serde(default, deserialize_with = "de::count")]
    pub followers_count: u32,
    #[serde(default, deserialize_with = "de::count")]
    pub following_count: u32,
    #[serde(default)]
    pub is_following: Option<bool>,
}

// ── Users / auth ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub followers_count: u32,
    #[serde(default, deserialize_with = "de::count")]
    pub following_count: u32,
    #[serde(default)]
    pub is_following: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// `POST /auth/login` and `POST /auth/register` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
