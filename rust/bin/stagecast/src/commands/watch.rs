//! `stagecast watch`: live feed until Ctrl-C.

use anyhow::Result;
use stagecast_cache::SessionFeed;
use tokio::sync::mpsc;
use tracing::info;

use super::{Runtime, feed, print_sessions};
use crate::{FeedFilter, Output};

pub async fn run(rt: &Runtime, filter: &FeedFilter, out: Output) -> Result<()> {
    feed::load(rt, filter).await?;
    print_sessions(&rt.cache.feed().items, out)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<SessionFeed>();
    let sub = rt.cache.store().subscribe(SessionFeed::PATH, move |_, value| {
        if let Some(feed) = value.downcast_ref::<SessionFeed>() {
            let _ = tx.send(feed.clone());
        }
    });

    rt.cache.init();
    if !rt.context.realtime {
        println!("Realtime is off for context \"{}\"; the feed will not refresh.", rt.context.name);
    }
    info!("watching feed every {}s", rt.context.poll_interval_secs);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last = rt.cache.feed().items;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            Some(feed) = rx.recv() => {
                if feed.loading || feed.refreshing || feed.items == last {
                    continue;
                }
                println!();
                println!("── {} ──", chrono::Local::now().format("%H:%M:%S"));
                print_sessions(&feed.items, out)?;
                last = feed.items;
            }
        }
    }

    rt.cache.store().unsubscribe(sub);
    rt.cache.dispose();
    Ok(())
}
