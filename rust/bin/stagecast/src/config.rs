//! Client-side context management.
//!
//! Reads/writes `~/.stagecast/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Poll interval bounds accepted in a context.
pub const POLL_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 15..=60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// A single context: one Stagecast API endpoint and its credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "prod").
    pub name: String,

    /// API base URL (e.g. "https://api.example.com/api").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// JWT token (set by `stagecast login`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    #[serde(rename = "poll-interval-secs", default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Background refresh on/off.
    #[serde(default = "default_true")]
    pub realtime: bool,

    #[serde(rename = "page-limit", default, skip_serializing_if = "Option::is_none")]
    pub page_limit: Option<u32>,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Context {
    pub fn new(name: &str, server: &str) -> Self {
        Self {
            name: name.to_string(),
            server: server.to_string(),
            token: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            realtime: true,
            page_limit: None,
        }
    }

    /// The configured poll interval, rejected outside 15–60 seconds.
    pub fn poll_interval(&self) -> anyhow::Result<Duration> {
        anyhow::ensure!(
            POLL_INTERVAL_RANGE.contains(&self.poll_interval_secs),
            "poll-interval-secs for context \"{}\" must be between {} and {} (got {})",
            self.name,
            POLL_INTERVAL_RANGE.start(),
            POLL_INTERVAL_RANGE.end(),
            self.poll_interval_secs
        );
        Ok(Duration::from_secs(self.poll_interval_secs))
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.stagecast/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.get(&self.current_context)
    }

    /// The active context, or an error telling the user how to pick one.
    pub fn require_current(&self) -> anyhow::Result<&Context> {
        let ctx = self
            .current()
            .ok_or_else(|| anyhow::anyhow!("No current context. Run `stagecast use context <name>`."))?;
        if ctx.server.is_empty() {
            anyhow::bail!(
                "No server URL set for context \"{}\". Run `stagecast context set {} --server <url>`.",
                ctx.name,
                ctx.name
            );
        }
        Ok(ctx)
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Return the Stagecast config directory (~/.stagecast).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".stagecast")
}
