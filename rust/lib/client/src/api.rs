use crate::error::ApiError;
use crate::model::*;

/// Everything the client core asks of the backend.
///
/// Implemented by [`crate::ApiClient`] over HTTP. The cache holds an
/// `Arc<dyn SocialApi>` and never talks to reqwest directly.
#[async_trait::async_trait]
pub trait SocialApi: Send + Sync + 'static {
    // ── Sessions ──

    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<Session>, ApiError>;

    async fn get_session(&self, id: &str) -> Result<Session, ApiError>;

    async fn create_session(&self, form: &NewSession) -> Result<Session, ApiError>;

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
    ) -> Result<Session, ApiError>;

    async fn delete_session(&self, id: &str) -> Result<(), ApiError>;

    // ── Interactions ──

    /// Like (`true`) or unlike (`false`). Returns the server's view of
    /// the flag.
    async fn set_like(&self, session_id: &str, liked: bool) -> Result<bool, ApiError>;

    /// Book (`true`) or cancel a booking (`false`). Returns the server's
    /// view of the flag.
    async fn set_booking(&self, session_id: &str, booked: bool) -> Result<bool, ApiError>;

    async fn add_comment(
        &self,
        session_id: &str,
        message: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, ApiError>;

    async fn list_comments(&self, session_id: &str) -> Result<Vec<Comment>, ApiError>;

    // ── Users ──

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;

    async fn set_follow(&self, user_id: &str, follow: bool) -> Result<FollowCounts, ApiError>;

    // ── Auth ──

    /// Authenticate and persist the returned token.
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    /// Create an account and persist the returned token.
    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn profile(&self) -> Result<User, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;

    /// Forget the stored token. No server call.
    async fn logout(&self) -> Result<(), ApiError>;
}
