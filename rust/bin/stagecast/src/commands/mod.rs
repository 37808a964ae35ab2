pub mod auth;
pub mod context;
pub mod feed;
pub mod interact;
pub mod session;
pub mod watch;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use stagecast_cache::{CacheConfig, FeedQuery, LiveCache};
use stagecast_client::{ApiClient, Session};

use crate::config::{ClientConfig, Context};
use crate::token::ContextTokenStore;
use crate::{FeedFilter, Output};

/// A connected cache for the current context.
pub struct Runtime {
    pub cache: Arc<LiveCache>,
    pub context: Context,
    pub config_path: PathBuf,
}

impl Runtime {
    pub fn connect(config_path: &Path) -> Result<Self> {
        let config = ClientConfig::load(config_path)?;
        let context = config.require_current()?.clone();
        let tokens = Arc::new(ContextTokenStore::new(config_path.to_path_buf(), &context.name));
        let client = ApiClient::new(&context.server, tokens)?;
        let cache_config = CacheConfig {
            poll_interval: context.poll_interval()?,
            realtime: context.realtime,
        };
        Ok(Self {
            cache: LiveCache::new(Arc::new(client), cache_config),
            context,
            config_path: config_path.to_path_buf(),
        })
    }

    /// Category query from CLI filters, with the context's page limit as
    /// the default.
    pub fn query(&self, filter: &FeedFilter) -> FeedQuery {
        FeedQuery {
            status: filter.status,
            genre: filter.genre.clone(),
            user_id: filter.user.clone(),
            page: filter.page,
            limit: filter.limit.or(self.context.page_limit),
        }
    }

    /// Fetch a session into the cache unless it is already there.
    pub async fn ensure_session(&self, id: &str) -> Result<Session> {
        match self.cache.session(id) {
            Some(s) => Ok(s),
            None => Ok(self.cache.track_session(id).await?),
        }
    }
}

/// Read one line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N]: "))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_sessions(sessions: &[Session], out: Output) -> Result<()> {
    if out == Output::Json {
        return print_json(&sessions);
    }
    if sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }
    println!(
        "{:12} {:10} {:32} {:16} {:>6} {:>6} {:>6}",
        "ID", "STATUS", "TITLE", "BY", "LIKES", "BOOKS", "CMTS"
    );
    for s in sessions {
        println!(
            "{:12} {:10} {:32} {:16} {:>6} {:>6} {:>6}",
            s.id,
            s.status,
            truncate(&s.title, 32),
            truncate(&s.user.username, 16),
            mark(s.likes_count, s.is_liked),
            mark(s.bookings_count, s.is_booked),
            s.comments_count,
        );
    }
    Ok(())
}

/// Count with a `*` when the current user has set the flag.
fn mark(count: u32, on: bool) -> String {
    if on { format!("{count}*") } else { count.to_string() }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
    t.push('…');
    t
}
