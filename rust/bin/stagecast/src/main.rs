//! `stagecast`: command-line client for the Stagecast social/live API.
//!
//! Manages contexts and credentials, browses and searches the session
//! feed, and drives likes, bookings, comments and follows through the
//! optimistic cache. `stagecast watch` keeps the feed live on screen.

mod commands;
mod config;
mod token;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use stagecast_client::SessionStatus;

use crate::commands::Runtime;
use crate::config::ClientConfig;

/// Stagecast CLI.
#[derive(Parser, Debug)]
#[command(name = "stagecast", version, about = "Stagecast CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.stagecast/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Sign in to the current context's server.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended: use interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the token from the current context.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// List sessions.
    Feed {
        #[command(flatten)]
        filter: FeedFilter,
    },

    /// Show one session.
    Show { id: String },

    /// Like or unlike a session.
    Like { id: String },

    /// Book or cancel a booking.
    Book { id: String },

    /// Comment on a session.
    Comment {
        id: String,
        message: String,
        /// Reply to this comment.
        #[arg(long)]
        parent: Option<String>,
    },

    /// List a session's comments.
    Comments { id: String },

    /// Follow or unfollow a user.
    Follow { user_id: String },

    /// Show a user's profile (your own when no id is given).
    Profile {
        user_id: Option<String>,
        /// Update your own bio.
        #[arg(long)]
        bio: Option<String>,
        /// Update your own display name.
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Create, change or delete sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Keep the feed on screen, refreshing in the background.
    Watch {
        #[command(flatten)]
        filter: FeedFilter,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FeedFilter {
    /// scheduled, live, ended or cancelled.
    #[arg(long)]
    pub status: Option<SessionStatus>,
    #[arg(long)]
    pub genre: Option<String>,
    /// Only sessions by this user.
    #[arg(long)]
    pub user: Option<String>,
    /// Server-side search instead of a category.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        /// API base URL, e.g. https://api.example.com/api.
        #[arg(long)]
        server: String,
        #[arg(long)]
        poll_interval_secs: Option<u64>,
        #[arg(long)]
        page_limit: Option<u32>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        poll_interval_secs: Option<u64>,
        #[arg(long)]
        realtime: Option<bool>,
        #[arg(long)]
        page_limit: Option<u32>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Create a post or an event.
    Create {
        #[arg(long)]
        title: String,
        /// post or event.
        #[arg(long = "type", default_value = "post")]
        kind: String,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        /// RFC 3339, e.g. 2026-10-20T19:00:00Z.
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Poster image file.
        #[arg(long)]
        poster: Option<PathBuf>,
        /// Video file.
        #[arg(long)]
        video: Option<PathBuf>,
    },
    /// Move a session to a new status.
    Status { id: String, status: SessionStatus },
    /// Delete a session.
    Delete {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(ClientConfig::default_path);
    let out = cli.output;

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create { name, server, poll_interval_secs, page_limit } => {
                commands::context::create(&name, &server, poll_interval_secs, page_limit, &config_path)?;
            }
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Set { name, server, poll_interval_secs, realtime, page_limit } => {
                let changes = commands::context::ContextChanges {
                    server,
                    poll_interval_secs,
                    realtime,
                    page_limit,
                };
                commands::context::set(&name, changes, &config_path)?;
            }
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path)?,
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => commands::context::use_context(&name, &config_path)?,
        },

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => commands::prompt("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            let rt = Runtime::connect(&config_path)?;
            commands::auth::login(&rt, &email, &password).await?;
        }

        Commands::Register { username, email, display_name, password } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let pw = rpassword::prompt_password("Password: ")?;
                    let confirm = rpassword::prompt_password("Confirm password: ")?;
                    if pw != confirm {
                        anyhow::bail!("Passwords do not match.");
                    }
                    pw
                }
            };
            let rt = Runtime::connect(&config_path)?;
            let req = stagecast_client::RegisterRequest { username, email, password, display_name };
            commands::auth::register(&rt, &req).await?;
        }

        Commands::Logout => {
            let rt = Runtime::connect(&config_path)?;
            commands::auth::logout(&rt).await?;
        }

        Commands::Whoami => {
            let rt = Runtime::connect(&config_path)?;
            commands::auth::whoami(&rt, out).await?;
        }

        Commands::Feed { filter } => {
            let rt = Runtime::connect(&config_path)?;
            commands::feed::list(&rt, &filter, out).await?;
        }

        Commands::Show { id } => {
            let rt = Runtime::connect(&config_path)?;
            commands::feed::show(&rt, &id, out).await?;
        }

        Commands::Like { id } => {
            let rt = Runtime::connect(&config_path)?;
            commands::interact::like(&rt, &id).await?;
        }

        Commands::Book { id } => {
            let rt = Runtime::connect(&config_path)?;
            commands::interact::book(&rt, &id).await?;
        }

        Commands::Comment { id, message, parent } => {
            let rt = Runtime::connect(&config_path)?;
            commands::interact::comment(&rt, &id, &message, parent.as_deref()).await?;
        }

        Commands::Comments { id } => {
            let rt = Runtime::connect(&config_path)?;
            commands::interact::comments(&rt, &id, out).await?;
        }

        Commands::Follow { user_id } => {
            let rt = Runtime::connect(&config_path)?;
            commands::interact::follow(&rt, &user_id).await?;
        }

        Commands::Profile { user_id, bio, display_name } => {
            let rt = Runtime::connect(&config_path)?;
            match user_id {
                Some(id) => commands::auth::profile(&rt, &id, out).await?,
                None if bio.is_some() || display_name.is_some() => {
                    let update = stagecast_client::ProfileUpdate { display_name, bio, avatar: None };
                    commands::auth::update_profile(&rt, &update, out).await?;
                }
                None => commands::auth::whoami(&rt, out).await?,
            }
        }

        Commands::Session { action } => {
            let rt = Runtime::connect(&config_path)?;
            match action {
                SessionAction::Create { title, kind, caption, genre, start, end, poster, video } => {
                    let form = stagecast_client::NewSession {
                        title,
                        caption,
                        kind,
                        genre,
                        start_time: start,
                        end_time: end,
                        poster,
                        video,
                    };
                    commands::session::create(&rt, &form, out).await?;
                }
                SessionAction::Status { id, status } => {
                    commands::session::set_status(&rt, &id, status).await?;
                }
                SessionAction::Delete { id, yes } => {
                    if !yes && !commands::confirm(&format!("Delete session {id}?"))? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    commands::session::delete(&rt, &id).await?;
                }
            }
        }

        Commands::Watch { filter } => {
            let rt = Runtime::connect(&config_path)?;
            commands::watch::run(&rt, &filter, out).await?;
        }
    }

    Ok(())
}
