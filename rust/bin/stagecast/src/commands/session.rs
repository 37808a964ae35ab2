//! Session lifecycle commands.

use anyhow::Result;
use stagecast_client::{NewSession, SessionStatus};

use super::{Runtime, print_json};
use crate::Output;

pub async fn create(rt: &Runtime, form: &NewSession, out: Output) -> Result<()> {
    let s = rt.cache.create_session(form).await?;
    if out == Output::Json {
        return print_json(&s);
    }
    println!("Session {} created ({}).", s.id, s.status);
    Ok(())
}

pub async fn set_status(rt: &Runtime, id: &str, status: SessionStatus) -> Result<()> {
    rt.ensure_session(id).await?;
    let s = rt.cache.update_status(id, status).await?;
    println!("Session {} is now {}.", s.id, s.status);
    Ok(())
}

pub async fn delete(rt: &Runtime, id: &str) -> Result<()> {
    rt.cache.delete_session(id).await?;
    println!("Session {} deleted.", id);
    Ok(())
}
