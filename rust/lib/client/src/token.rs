use tokio::sync::RwLock;

use crate::error::ApiError;

/// Where the bearer token lives between requests.
///
/// On devices this is the platform's secure storage; the CLI keeps it in
/// its config file. `ApiClient` loads it before every request, saves it
/// after login/register and clears it on any 401.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn load(&self) -> Result<Option<String>, ApiError>;
    async fn save(&self, token: &str) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

/// Process-local token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), ApiError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        *self.token.write().await = None;
        Ok(())
    }
}
