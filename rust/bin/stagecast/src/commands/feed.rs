//! Feed browsing commands.

use anyhow::Result;

use super::{Runtime, print_json, print_sessions};
use crate::{FeedFilter, Output};

/// `stagecast feed`: a category load, or a search when `--search` is set.
pub async fn list(rt: &Runtime, filter: &FeedFilter, out: Output) -> Result<()> {
    load(rt, filter).await?;
    print_sessions(&rt.cache.feed().items, out)
}

/// Load the feed the way `filter` asks for.
pub async fn load(rt: &Runtime, filter: &FeedFilter) -> Result<()> {
    rt.cache.load_feed(rt.query(filter)).await?;
    if let Some(text) = filter.search.as_deref() {
        rt.cache.search(text).await?;
    }
    Ok(())
}

pub async fn show(rt: &Runtime, id: &str, out: Output) -> Result<()> {
    let s = rt.cache.track_session(id).await?;
    if out == Output::Json {
        return print_json(&s);
    }
    println!("{}", s.title);
    println!("  id:       {}", s.id);
    println!("  status:   {}", s.status);
    if let Some(kind) = &s.kind {
        println!("  type:     {}", kind);
    }
    if let Some(genre) = &s.genre {
        println!("  genre:    {}", genre);
    }
    println!("  by:       {} ({})", s.user.username, s.user.id);
    if let Some(start) = s.start_time {
        println!("  starts:   {}", start.to_rfc3339());
    }
    if let Some(end) = s.end_time {
        println!("  ends:     {}", end.to_rfc3339());
    }
    if let Some(caption) = &s.caption {
        println!("  caption:  {}", caption);
    }
    println!("  likes:    {}{}", s.likes_count, if s.is_liked { " (liked)" } else { "" });
    println!("  bookings: {}{}", s.bookings_count, if s.is_booked { " (booked)" } else { "" });
    println!("  comments: {}", s.comments_count);
    Ok(())
}
