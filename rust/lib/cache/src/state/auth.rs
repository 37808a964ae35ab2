//! Auth state: stored at `auth/state`.

use stagecast_client::User;

/// Authentication state: the UI reads this to decide what to show.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    pub busy: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Token may exist but has not been checked against the server.
    Unknown,
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn unknown() -> Self {
        Self { phase: AuthPhase::Unknown, user: None, busy: false, error: None }
    }

    pub fn signed_out(error: Option<String>) -> Self {
        Self { phase: AuthPhase::Unauthenticated, user: None, busy: false, error }
    }

    pub fn signed_in(user: User) -> Self {
        Self { phase: AuthPhase::Authenticated, user: Some(user), busy: false, error: None }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}
