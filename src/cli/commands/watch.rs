use crate::domain::{EpisodeId, ListId, ShowId};
use crate::state::AppState;

pub async fn cmd_watch(state: &AppState, list_id: i32, episode_id: i64) -> anyhow::Result<()> {
    let list_id = ListId::new(list_id);
    let episode_id = EpisodeId::new(episode_id);

    let marks = state.watch.toggle(list_id, episode_id).await?;
    let watched = marks.iter().any(|m| m.episode_id == episode_id);

    if watched {
        println!("✓ Episode {episode_id} marked watched");
    } else {
        println!("○ Episode {episode_id} marked unwatched");
    }
    println!("{} episode(s) watched in list {list_id}", marks.len());

    Ok(())
}

pub async fn cmd_watch_all(state: &AppState, list_id: i32, show_id: i32) -> anyhow::Result<()> {
    let list_id = ListId::new(list_id);
    let before = state.watch.marks(list_id).await?.len();

    let marks = state
        .watch
        .mark_all_watched(list_id, ShowId::new(show_id))
        .await?;

    println!(
        "✓ Marked {} episode(s) of show {show_id} watched",
        marks.len().saturating_sub(before)
    );

    Ok(())
}
