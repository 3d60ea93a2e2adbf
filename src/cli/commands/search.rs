use crate::state::AppState;

pub async fn cmd_search(state: &AppState, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let matches = state.catalog.search(query).await?;

    if matches.is_empty() {
        println!("No shows found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("{:-<60}", "");

    for show in &matches {
        let year = show
            .first_air_date
            .map_or_else(|| "????".to_string(), |d| d.format("%Y").to_string());
        println!("[{}] {} ({year})", show.show_id, show.name);
        if !show.overview.is_empty() {
            let overview: String = show.overview.chars().take(100).collect();
            println!("    {overview}");
        }
    }

    println!();
    println!("Add a show to a list by its ID.");

    Ok(())
}
