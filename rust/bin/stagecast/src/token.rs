//! Token storage backed by the active context in `config.toml`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use stagecast_client::{ApiError, TokenStore};
use tokio::sync::Mutex;

use crate::config::ClientConfig;

/// Keeps the JWT in the named context and rewrites the config file on
/// every change.
pub struct ContextTokenStore {
    path: PathBuf,
    context: String,
    lock: Mutex<()>,
}

impl ContextTokenStore {
    pub fn new(path: PathBuf, context: &str) -> Self {
        Self { path, context: context.to_string(), lock: Mutex::new(()) }
    }

    fn write(&self, token: &str) -> Result<(), ApiError> {
        let mut config = ClientConfig::load(&self.path).map_err(io_error)?;
        let ctx = config.get_mut(&self.context).ok_or_else(|| {
            ApiError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("context \"{}\" not found", self.context),
            ))
        })?;
        ctx.token = token.to_string();
        config.save(&self.path).map_err(io_error)
    }
}

fn io_error(e: anyhow::Error) -> ApiError {
    ApiError::Io(io::Error::other(e.to_string()))
}

#[async_trait]
impl TokenStore for ContextTokenStore {
    async fn load(&self) -> Result<Option<String>, ApiError> {
        let _guard = self.lock.lock().await;
        let config = ClientConfig::load(&self.path).map_err(io_error)?;
        Ok(config.get(&self.context).map(|c| c.token.clone()).filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<(), ApiError> {
        let _guard = self.lock.lock().await;
        self.write(token)
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let _guard = self.lock.lock().await;
        self.write("")
    }
}
