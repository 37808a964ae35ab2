use thiserror::Error;

/// Client-side API error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response other than 401.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// 401 from the server. The stored token has already been cleared.
    #[error("unauthenticated: {0}")]
    Unauthorized(String),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Local file access (multipart uploads, token files).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
