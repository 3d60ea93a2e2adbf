use crate::domain::ShowId;
use crate::state::AppState;

pub async fn cmd_refresh_show(state: &AppState, show_id: i32) -> anyhow::Result<()> {
    let show_id = ShowId::new(show_id);

    let result = state.sync.sync(&[show_id], true).await?;
    let report = &result.report;

    let label = if report.created.contains(&show_id) {
        "cached for the first time"
    } else if report.refreshed.contains(&show_id) {
        "refreshed"
    } else if report.unavailable.contains(&show_id) {
        "catalog unavailable, keeping cached data"
    } else {
        "still fresh, catalog not queried"
    };

    let Some(show) = result.shows.first() else {
        anyhow::bail!("Show {show_id} could not be fetched from the catalog");
    };

    println!("{} [{}]: {label}", show.name, show_id);
    println!(
        "  {} seasons | {} | {} episodes | last refreshed {}",
        show.season_count,
        if show.ended { "ended" } else { "running" },
        result.episodes.len(),
        show.last_refreshed_at.format("%Y-%m-%d %H:%M UTC")
    );
    if report.incomplete.contains(&show_id) {
        println!("  ⚠ Some seasons could not be fetched");
    }

    Ok(())
}
