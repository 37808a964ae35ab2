use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::SocialApi;
use crate::error::ApiError;
use crate::model::*;
use crate::token::TokenStore;

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Deserialize)]
struct SessionsEnvelope {
    sessions: Vec<Session>,
}

/// Single-session endpoints answer `{session: {...}}`, some older routes
/// answer the bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneSession {
    Wrapped { session: Session },
    Bare(Session),
}

impl OneSession {
    fn into_inner(self) -> Session {
        match self {
            OneSession::Wrapped { session } | OneSession::Bare(session) => session,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneUser {
    Wrapped { user: User },
    Bare(User),
}

impl OneUser {
    fn into_inner(self) -> User {
        match self {
            OneUser::Wrapped { user } | OneUser::Bare(user) => user,
        }
    }
}

#[derive(Deserialize, Default)]
struct LikeEnvelope {
    liked: Option<bool>,
}

#[derive(Deserialize, Default)]
struct BookEnvelope {
    booked: Option<bool>,
}

#[derive(Deserialize)]
struct CommentEnvelope {
    comment: Comment,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

// ── ApiClient ───────────────────────────────────────────────────────

/// HTTP implementation of [`SocialApi`].
///
/// All paths are relative to `base_url` (e.g. `https://host/api`).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_http_client(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url, tokens })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// `{base_url}/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    /// Attach the bearer token, if any.
    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.tokens.load().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Send with auth and map HTTP failures. A 401 clears the stored token.
    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let req = self.authed(builder).await?;
        let resp = req.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), url = %resp.url(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(resp).await;
            warn!("server rejected credentials, clearing stored token");
            self.tokens.clear().await?;
            return Err(ApiError::Unauthorized(message));
        }
        if !status.is_success() {
            let message = error_message(resp).await;
            return Err(ApiError::Server { status: status.as_u16(), message });
        }
        Ok(resp)
    }

    async fn fetch<R: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<R, ApiError> {
        let resp = self.execute(builder).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    /// Like `fetch`, but an empty body decodes to `R::default()`.
    async fn fetch_or_default<R: DeserializeOwned + Default>(
        &self,
        builder: RequestBuilder,
    ) -> Result<R, ApiError> {
        let resp = self.execute(builder).await?;
        let body = resp.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(R::default());
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    async fn authenticate(&self, builder: RequestBuilder) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self.fetch(builder).await?;
        self.tokens.save(&auth.token).await?;
        Ok(auth)
    }
}

/// Pull a human-readable message out of an error response.
///
/// The backend answers `{"message": "..."}` or `{"error": "..."}`; anything
/// else is returned as raw text.
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }
    if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text
    }
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(Part::bytes(bytes).file_name(name).mime_str(mime.as_ref())?)
}

fn toggle_method(on: bool) -> Method {
    if on { Method::POST } else { Method::DELETE }
}

#[async_trait::async_trait]
impl SocialApi for ApiClient {
    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<Session>, ApiError> {
        let req = self.request(Method::GET, &["sessions"]).query(query);
        let env: SessionsEnvelope = self.fetch(req).await?;
        Ok(env.sessions)
    }

    async fn get_session(&self, id: &str) -> Result<Session, ApiError> {
        let req = self.request(Method::GET, &["sessions", id]);
        let one: OneSession = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn create_session(&self, form: &NewSession) -> Result<Session, ApiError> {
        let mut multipart = Form::new()
            .text("title", form.title.clone())
            .text("type", form.kind.clone());
        if let Some(caption) = &form.caption {
            multipart = multipart.text("caption", caption.clone());
        }
        if let Some(genre) = &form.genre {
            multipart = multipart.text("genre", genre.clone());
        }
        if let Some(start) = form.start_time {
            multipart = multipart.text("start_time", start.to_rfc3339());
        }
        if let Some(end) = form.end_time {
            multipart = multipart.text("end_time", end.to_rfc3339());
        }
        if let Some(poster) = &form.poster {
            multipart = multipart.part("poster", file_part(poster).await?);
        }
        if let Some(video) = &form.video {
            multipart = multipart.part("video", file_part(video).await?);
        }

        let req = self.request(Method::POST, &["sessions"]).multipart(multipart);
        let one: OneSession = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
    ) -> Result<Session, ApiError> {
        let req = self
            .request(Method::PUT, &["sessions", id, "status"])
            .json(&serde_json::json!({ "status": status }));
        let one: OneSession = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &["sessions", id])).await?;
        Ok(())
    }

    async fn set_like(&self, session_id: &str, liked: bool) -> Result<bool, ApiError> {
        let req = self.request(toggle_method(liked), &["interactions", "like", session_id]);
        let env: LikeEnvelope = self.fetch_or_default(req).await?;
        Ok(env.liked.unwrap_or(liked))
    }

    async fn set_booking(&self, session_id: &str, booked: bool) -> Result<bool, ApiError> {
        let req = self.request(toggle_method(booked), &["interactions", "book", session_id]);
        let env: BookEnvelope = self.fetch_or_default(req).await?;
        Ok(env.booked.unwrap_or(booked))
    }

    async fn add_comment(
        &self,
        session_id: &str,
        message: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, ApiError> {
        let mut body = serde_json::json!({ "message": message });
        if let Some(parent) = parent_id {
            body["parent_id"] = serde_json::Value::String(parent.to_string());
        }
        let req = self
            .request(Method::POST, &["interactions", "comment", session_id])
            .json(&body);
        let env: CommentEnvelope = self.fetch(req).await?;
        Ok(env.comment)
    }

    async fn list_comments(&self, session_id: &str) -> Result<Vec<Comment>, ApiError> {
        let req = self.request(Method::GET, &["interactions", "comments", session_id]);
        let env: CommentsEnvelope = self.fetch(req).await?;
        Ok(env.comments)
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let req = self.request(Method::GET, &["users", user_id]);
        let one: OneUser = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn set_follow(&self, user_id: &str, follow: bool) -> Result<FollowCounts, ApiError> {
        let req = self.request(toggle_method(follow), &["users", user_id, "follow"]);
        self.fetch(req).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = self
            .request(Method::POST, &["auth", "login"])
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.authenticate(req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let req = self.request(Method::POST, &["auth", "register"]).json(req);
        self.authenticate(req).await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        let req = self.request(Method::GET, &["auth", "profile"]);
        let one: OneUser = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let req = self.request(Method::PUT, &["auth", "profile"]).json(update);
        let one: OneUser = self.fetch(req).await?;
        Ok(one.into_inner())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.tokens.clear().await
    }
}
