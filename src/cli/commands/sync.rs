//! Sync command handler

use crate::domain::ListId;
use crate::services::ViewError;
use crate::state::AppState;

pub async fn cmd_sync(state: &AppState, list_id: i32, force: bool) -> anyhow::Result<()> {
    let list_id = ListId::new(list_id);
    let list = state
        .store
        .get_list(list_id)
        .await?
        .ok_or(ViewError::ListNotFound(list_id))?;

    if force {
        println!("Refreshing {} ({} shows)...", list.name, list.show_ids.len());
    }

    let result = state.sync.sync(&list.show_ids, force).await?;
    let report = &result.report;

    println!("{}", list.name);
    println!("{:-<60}", "");

    for show in &result.shows {
        let count = result
            .episodes
            .iter()
            .filter(|e| e.show_id == show.show_id)
            .count();
        let status = if show.ended { "ended" } else { "running" };
        println!(
            "  [{}] {} - {} seasons, {} episodes ({status})",
            show.show_id, show.name, show.season_count, count
        );
    }

    let missing = list.show_ids.len() - result.shows.len();
    if missing > 0 {
        println!("  {missing} show(s) not cached yet. Run with --force to fetch them.");
    }

    if force {
        println!();
        println!(
            "Shows: {} new, {} refreshed, {} unavailable",
            report.created.len(),
            report.refreshed.len(),
            report.unavailable.len()
        );
        println!(
            "Episodes: {} new, {} updated, {} unchanged",
            report.episodes.created, report.episodes.updated, report.episodes.unchanged
        );
        for id in &report.unavailable {
            println!("  ⚠ Show {id}: catalog unavailable, serving cached data");
        }
        for id in &report.incomplete {
            println!("  ⚠ Show {id}: some seasons could not be fetched");
        }
    }

    Ok(())
}
