//! Stagecast REST client.
//!
//! Typed access to the sessions / interactions / users / auth endpoints.
//! Authentication is a bearer token kept in a pluggable [`TokenStore`];
//! a 401 from any endpoint clears the stored token.
//!
//! The cache layer depends only on the [`SocialApi`] trait, so it can be
//! driven by [`ApiClient`] in production and by an in-process fake in tests.
//!
//! # Usage
//!
//! ```ignore
//! use stagecast_client::{ApiClient, MemoryTokenStore, SessionQuery, SocialApi};
//!
//! let client = ApiClient::new("http://localhost:3000/api", Arc::new(MemoryTokenStore::new()));
//! client.login("ada@example.com", "secret").await?;
//! let live = client.list_sessions(&SessionQuery::status(SessionStatus::Live)).await?;
//! ```

mod de;

pub mod api;
pub mod error;
pub mod http;
pub mod model;
pub mod token;

pub use api::SocialApi;
pub use error::ApiError;
pub use http::ApiClient;
pub use model::*;
pub use token::{MemoryTokenStore, TokenStore};
