use crate::domain::ListId;
use crate::state::AppState;

pub async fn cmd_feed(state: &AppState, list_id: i32) -> anyhow::Result<()> {
    let feed = state.feed.calendar(ListId::new(list_id)).await?;

    if feed.events.is_empty() {
        println!("No dated episodes for {}.", feed.name);
        return Ok(());
    }

    println!("{} ({} events)", feed.name, feed.events.len());
    println!("{:-<70}", "");

    for event in &feed.events {
        println!("{}  {} ({})", event.date, event.summary, event.description);
    }

    Ok(())
}
