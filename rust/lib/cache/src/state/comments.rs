//! Comment list for one session: stored at `sessions/comments/{id}`.

use stagecast_client::Comment;

#[derive(Debug, Clone, PartialEq)]
pub struct CommentList {
    pub session_id: String,
    pub items: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CommentList {
    pub const PREFIX: &'static str = "sessions/comments";

    pub fn path(session_id: &str) -> String {
        format!("{}/{}", Self::PREFIX, session_id)
    }

    pub fn loading(session_id: &str) -> Self {
        Self { session_id: session_id.to_string(), items: vec![], loading: true, error: None }
    }
}
