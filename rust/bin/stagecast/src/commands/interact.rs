//! Like / book / comment / follow commands.

use anyhow::Result;

use super::{Runtime, print_json};
use crate::Output;

pub async fn like(rt: &Runtime, id: &str) -> Result<()> {
    rt.ensure_session(id).await?;
    let liked = rt.cache.toggle_like(id).await?;
    let count = rt.cache.session(id).map(|s| s.likes_count).unwrap_or_default();
    println!("{} {} ({} likes).", if liked { "Liked" } else { "Unliked" }, id, count);
    Ok(())
}

pub async fn book(rt: &Runtime, id: &str) -> Result<()> {
    rt.ensure_session(id).await?;
    let booked = rt.cache.toggle_book(id).await?;
    let count = rt.cache.session(id).map(|s| s.bookings_count).unwrap_or_default();
    println!(
        "{} {} ({} bookings).",
        if booked { "Booked" } else { "Cancelled booking for" },
        id,
        count
    );
    Ok(())
}

pub async fn comment(rt: &Runtime, id: &str, message: &str, parent: Option<&str>) -> Result<()> {
    rt.ensure_session(id).await?;
    let c = rt.cache.add_comment(id, message, parent).await?;
    println!("Comment {} added to {}.", c.id, id);
    Ok(())
}

pub async fn comments(rt: &Runtime, id: &str, out: Output) -> Result<()> {
    let items = rt.cache.load_comments(id).await?;
    if out == Output::Json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No comments.");
        return Ok(());
    }
    for c in &items {
        let who = c.user.as_ref().map(|u| u.username.as_str()).unwrap_or("?");
        let indent = if c.parent_id.is_some() { "    " } else { "" };
        println!("{indent}[{}] {}: {}", c.id, who, c.message);
    }
    Ok(())
}

pub async fn follow(rt: &Runtime, user_id: &str) -> Result<()> {
    rt.cache.load_profile(user_id).await?;
    let counts = rt.cache.toggle_follow(user_id).await?;
    let following = rt.cache.follow_state(user_id).map(|f| f.is_following).unwrap_or_default();
    println!(
        "{} {} ({} followers).",
        if following { "Following" } else { "Unfollowed" },
        user_id,
        counts.followers_count
    );
    Ok(())
}
