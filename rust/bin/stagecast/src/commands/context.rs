//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context, POLL_INTERVAL_RANGE};

/// Create a new context. The first context becomes current.
pub fn create(
    name: &str,
    server: &str,
    poll_interval_secs: Option<u64>,
    page_limit: Option<u32>,
    client_config_path: &Path,
) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    if config.get(name).is_some() {
        anyhow::bail!("Context \"{}\" already exists. Use `stagecast context set`.", name);
    }

    let mut ctx = Context::new(name, server);
    if let Some(secs) = poll_interval_secs {
        ctx.poll_interval_secs = secs;
    }
    ctx.page_limit = page_limit;
    ctx.poll_interval()?;

    config.upsert_context(ctx);
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(client_config_path)?;

    println!("Context \"{}\" created.", name);
    println!("  Server: {}", server);
    Ok(())
}

/// List all contexts.
pub fn list(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: stagecast context create <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:16} {:40} {:6} {:8} {:6}", "", "NAME", "SERVER", "POLL", "REALTIME", "AUTH");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        let auth = if ctx.token.is_empty() { "-" } else { "yes" };
        println!(
            "{:2} {:16} {:40} {:6} {:8} {:6}",
            marker,
            ctx.name,
            server,
            format!("{}s", ctx.poll_interval_secs),
            ctx.realtime,
            auth
        );
    }
    Ok(())
}

/// Fields `context set` may change.
#[derive(Debug, Default)]
pub struct ContextChanges {
    pub server: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub realtime: Option<bool>,
    pub page_limit: Option<u32>,
}

pub fn set(name: &str, changes: ContextChanges, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    let ctx = config
        .get_mut(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if let Some(server) = changes.server {
        // A different server means a different account.
        if server != ctx.server {
            ctx.token.clear();
        }
        ctx.server = server;
    }
    if let Some(secs) = changes.poll_interval_secs {
        anyhow::ensure!(
            POLL_INTERVAL_RANGE.contains(&secs),
            "poll interval must be between {} and {} seconds",
            POLL_INTERVAL_RANGE.start(),
            POLL_INTERVAL_RANGE.end()
        );
        ctx.poll_interval_secs = secs;
    }
    if let Some(realtime) = changes.realtime {
        ctx.realtime = realtime;
    }
    if let Some(limit) = changes.page_limit {
        ctx.page_limit = Some(limit);
    }
    config.save(client_config_path)?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    config.save(client_config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

/// Switch current context.
pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if config.get(name).is_none() {
        anyhow::bail!(
            "Context \"{}\" not found. Run `stagecast context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(client_config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}
