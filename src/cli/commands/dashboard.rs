//! Dashboard command handler

use crate::domain::ListId;
use crate::state::AppState;

pub async fn cmd_dashboard(state: &AppState, list_id: i32) -> anyhow::Result<()> {
    let dashboard = state.dashboard.dashboard(ListId::new(list_id)).await?;

    println!("{}", dashboard.list.name);
    println!("{:-<70}", "");

    if dashboard.shows.is_empty() {
        println!("No cached shows. Run: tv2cal sync {list_id} --force");
        return Ok(());
    }

    for row in &dashboard.shows {
        println!(
            "{} [{}] - {} to watch",
            row.show.name, row.show.show_id, row.unwatched_aired
        );

        for item in &row.episodes {
            let icon = match (item.watched, item.aired) {
                (true, _) => "✓",
                (false, true) => "○",
                (false, false) => "📅",
            };
            let date = item
                .episode
                .air_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            println!(
                "  {icon} {:<8} {:<10} {} (ID: {})",
                item.episode.code(),
                date,
                item.episode.name,
                item.episode.episode_id
            );
        }
        println!();
    }

    println!("Legend: ✓ Watched | ○ Aired | 📅 Upcoming");

    Ok(())
}
