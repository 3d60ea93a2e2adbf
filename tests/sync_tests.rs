//! Integration tests for the cache refresh and episode reconciliation flow.

mod common;

use chrono::{Duration, Utc};
use common::{FakeCatalog, LIST_ID, SHOW_ID, episode, seed_list, spawn_state};
use std::collections::HashSet;
use std::sync::Arc;
use tv2cal::Config;
use tv2cal::clients::CatalogClient as _;
use tv2cal::db::Store;
use tv2cal::domain::{ListId, ShowId};
use tv2cal::services::{Freshness, ShowCacheError, ViewError};
use tv2cal::state::AppState;

fn show_ids() -> Vec<ShowId> {
    vec![ShowId::new(SHOW_ID)]
}

#[tokio::test]
async fn test_first_sync_creates_show_and_all_episodes() {
    let (state, catalog) = spawn_state().await;

    let result = state.sync.sync(&show_ids(), true).await.unwrap();

    assert_eq!(result.shows.len(), 1);
    assert_eq!(result.shows[0].name, "The Example");
    assert_eq!(result.shows[0].season_count, 3);
    assert_eq!(result.episodes.len(), 7);
    assert_eq!(result.report.created, show_ids());
    assert_eq!(result.report.episodes.created, 7);
    assert_eq!(catalog.show_calls(), 1);
    assert_eq!(catalog.season_calls(), 3);
}

#[tokio::test]
async fn test_cache_only_sync_makes_no_upstream_calls() {
    let (state, catalog) = spawn_state().await;
    let first = state.sync.sync(&show_ids(), true).await.unwrap();
    let calls = catalog.upstream_calls();

    let second = state.sync.sync(&show_ids(), false).await.unwrap();

    assert_eq!(catalog.upstream_calls(), calls);
    let ids = |eps: &[tv2cal::models::Episode]| -> HashSet<i64> {
        eps.iter().map(|e| e.episode_id.value()).collect()
    };
    assert_eq!(ids(&first.episodes), ids(&second.episodes));
    assert!(second.report.created.is_empty());
}

#[tokio::test]
async fn test_forced_sync_within_window_reuses_cache() {
    let (state, catalog) = spawn_state().await;
    state.sync.sync(&show_ids(), true).await.unwrap();
    let calls = catalog.upstream_calls();

    let result = state.sync.sync(&show_ids(), true).await.unwrap();

    assert_eq!(catalog.upstream_calls(), calls);
    assert!(result.report.refreshed.is_empty());
    assert_eq!(result.episodes.len(), 7);
}

#[tokio::test]
async fn test_cache_only_sync_omits_uncached_shows() {
    let (state, catalog) = spawn_state().await;

    let result = state.sync.sync(&show_ids(), false).await.unwrap();

    assert!(result.shows.is_empty());
    assert!(result.episodes.is_empty());
    assert_eq!(catalog.upstream_calls(), 0);
}

#[tokio::test]
async fn test_stale_show_is_refetched_exactly_once() {
    let (state, catalog) = spawn_state().await;
    let start = Utc::now();
    let created = state.sync.show_cache().ensure_fresh_at(ShowId::new(SHOW_ID), start).await.unwrap();
    assert_eq!(created.freshness, Freshness::Created);
    assert_eq!(catalog.show_calls(), 1);

    let later = start + Duration::hours(7);
    let refreshed = state
        .sync
        .show_cache()
        .ensure_fresh_at(ShowId::new(SHOW_ID), later)
        .await
        .unwrap();

    assert_eq!(refreshed.freshness, Freshness::Refreshed);
    assert_eq!(catalog.show_calls(), 2);
    assert_eq!(
        refreshed.show.last_refreshed_at.timestamp(),
        later.timestamp()
    );
}

#[tokio::test]
async fn test_fresh_show_makes_zero_upstream_calls() {
    let (state, catalog) = spawn_state().await;
    let start = Utc::now();
    let cache = state.sync.show_cache();
    cache.ensure_fresh_at(ShowId::new(SHOW_ID), start).await.unwrap();

    let again = cache
        .ensure_fresh_at(ShowId::new(SHOW_ID), start + Duration::hours(5))
        .await
        .unwrap();

    assert_eq!(again.freshness, Freshness::Cached);
    assert_eq!(catalog.show_calls(), 1);
}

#[tokio::test]
async fn test_stale_refresh_picks_up_changed_episodes() {
    let (state, catalog) = spawn_state().await;
    let start = Utc::now();
    state.sync.sync_at(&show_ids(), true, start).await.unwrap();

    catalog.set_season(
        SHOW_ID,
        3,
        vec![
            episode(3001, 3, 1, Some("2022-09-12")),
            episode(3002, 3, 2, Some("2023-01-02")),
            episode(3003, 3, 3, None),
        ],
    );

    let result = state
        .sync
        .sync_at(&show_ids(), true, start + Duration::hours(7))
        .await
        .unwrap();

    assert_eq!(result.report.refreshed, show_ids());
    assert_eq!(result.report.episodes.created, 1);
    assert_eq!(result.report.episodes.updated, 1);
    assert_eq!(result.episodes.len(), 8);

    let moved = result
        .episodes
        .iter()
        .find(|e| e.episode_id.value() == 3002)
        .unwrap();
    assert_eq!(moved.air_date.unwrap().to_string(), "2023-01-02");
}

#[tokio::test]
async fn test_upstream_failure_serves_stale_row() {
    let (state, catalog) = spawn_state().await;
    let start = Utc::now();
    state.sync.sync_at(&show_ids(), true, start).await.unwrap();

    catalog.set_failing(true);
    let later = start + Duration::days(2);

    let err = state
        .sync
        .show_cache()
        .ensure_fresh_at(ShowId::new(SHOW_ID), later)
        .await
        .unwrap_err();
    assert!(matches!(err, ShowCacheError::UpstreamUnavailable { .. }));
    assert_eq!(err.cached().map(|s| s.name.as_str()), Some("The Example"));

    let result = state.sync.sync_at(&show_ids(), true, later).await.unwrap();
    assert_eq!(result.report.unavailable, show_ids());
    assert_eq!(result.shows.len(), 1);
    assert_eq!(result.episodes.len(), 7);
}

#[tokio::test]
async fn test_upstream_failure_without_cache_is_reported() {
    let (state, catalog) = spawn_state().await;
    catalog.set_failing(true);

    let result = state.sync.sync(&show_ids(), true).await.unwrap();

    assert!(result.shows.is_empty());
    assert_eq!(result.report.unavailable, show_ids());
}

#[tokio::test]
async fn test_season_failure_keeps_earlier_seasons() {
    let (state, catalog) = spawn_state().await;
    catalog.fail_season(Some(2));

    let result = state.sync.sync(&show_ids(), true).await.unwrap();

    assert_eq!(result.report.incomplete, show_ids());
    assert_eq!(catalog.season_calls(), 2);
    assert!(result.episodes.iter().all(|e| e.season_number == 1));
    assert_eq!(result.episodes.len(), 3);
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let (state, _) = spawn_state().await;
    state.sync.sync(&show_ids(), true).await.unwrap();

    let episodes = state.sync.episode_store();
    let season = common::three_season_show().remove(0);

    let first = episodes.reconcile_season(ShowId::new(SHOW_ID), 1, &season).await.unwrap();
    let second = episodes.reconcile_season(ShowId::new(SHOW_ID), 1, &season).await.unwrap();

    assert_eq!(first.created + first.updated, 0);
    assert_eq!(second.unchanged, 3);

    let rows = episodes.list_episodes(&show_ids()).await.unwrap();
    let keys: HashSet<(i32, i32)> = rows
        .iter()
        .map(|e| (e.season_number, e.episode_number))
        .collect();
    assert_eq!(keys.len(), rows.len());
    assert_eq!(rows.len(), 7);
}

#[tokio::test]
async fn test_reconcile_skips_foreign_and_duplicate_records() {
    let (state, _) = spawn_state().await;
    state.sync.sync(&show_ids(), true).await.unwrap();
    let episodes = state.sync.episode_store();

    let stats = episodes
        .reconcile_season(
            ShowId::new(SHOW_ID),
            1,
            &[
                episode(1004, 1, 4, Some("2020-01-27")),
                episode(1004, 1, 4, Some("2020-01-27")),
                episode(2001, 2, 1, Some("2021-03-01")),
                episode(9999, 1, 0, None),
            ],
        )
        .await
        .unwrap();

    assert_eq!(stats.created, 1);
    assert_eq!(stats.skipped, 3);
}

#[tokio::test]
async fn test_duplicate_ids_in_request_are_synced_once() {
    let (state, catalog) = spawn_state().await;
    let ids = vec![ShowId::new(SHOW_ID), ShowId::new(SHOW_ID)];

    let result = state.sync.sync(&ids, true).await.unwrap();

    assert_eq!(result.shows.len(), 1);
    assert_eq!(catalog.show_calls(), 1);
}

#[tokio::test]
async fn test_shows_follow_request_order() {
    let catalog = Arc::new(FakeCatalog::default());
    catalog.add_show(1, "First", vec![vec![episode(11, 1, 1, Some("2020-01-01"))]]);
    catalog.add_show(2, "Second", vec![vec![episode(21, 1, 1, Some("2020-01-01"))]]);
    let store = Store::new("sqlite::memory:").await.unwrap();
    let state = AppState::with_catalog(&Config::default(), store, catalog).unwrap();

    let ids = vec![ShowId::new(2), ShowId::new(1)];
    let result = state.sync.sync(&ids, true).await.unwrap();

    let names: Vec<&str> = result.shows.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Second", "First"]);
}

#[tokio::test]
async fn test_feed_refreshes_and_lists_dated_episodes() {
    let (state, catalog) = spawn_state().await;

    let feed = state.feed.calendar(ListId::new(LIST_ID)).await.unwrap();

    assert_eq!(catalog.show_calls(), 1);
    assert_eq!(feed.name, "Weeknights");
    assert_eq!(feed.events.len(), 7);
    assert_eq!(feed.events[0].uid, "100-1001");
    assert_eq!(feed.events[0].summary, "The Example - Episode 1");
    assert_eq!(feed.events[6].description, "s3e2");
}

#[tokio::test]
async fn test_feed_for_unknown_list() {
    let (state, _) = spawn_state().await;

    let err = state.feed.calendar(ListId::new(42)).await.unwrap_err();

    assert!(matches!(err, ViewError::ListNotFound(_)));
}

#[tokio::test]
async fn test_dashboard_never_calls_catalog() {
    let (state, catalog) = spawn_state().await;
    seed_list(&state.store, 2, "Empty", &[]).await;

    let dashboard = state.dashboard.dashboard(ListId::new(LIST_ID)).await.unwrap();
    assert!(dashboard.shows.is_empty());
    assert_eq!(catalog.upstream_calls(), 0);

    state.sync.sync(&show_ids(), true).await.unwrap();
    let calls = catalog.upstream_calls();

    let dashboard = state.dashboard.dashboard(ListId::new(LIST_ID)).await.unwrap();
    assert_eq!(catalog.upstream_calls(), calls);
    assert_eq!(dashboard.shows.len(), 1);
    assert_eq!(dashboard.shows[0].unwatched_aired, 6);

    let empty = state.dashboard.dashboard(ListId::new(2)).await.unwrap();
    assert!(empty.shows.is_empty());
}

#[tokio::test]
async fn test_overlapping_syncs_share_one_refresh() {
    let (state, catalog) = spawn_state().await;
    let ids = show_ids();

    let (a, b) = tokio::join!(state.sync.sync(&ids, true), state.sync.sync(&ids, true));

    assert_eq!(a.unwrap().episodes.len(), 7);
    assert_eq!(b.unwrap().episodes.len(), 7);
    assert_eq!(catalog.show_calls(), 1);
    assert_eq!(catalog.season_calls(), 3);
}

#[tokio::test]
async fn test_renumbered_episode_keeps_one_row_per_id() {
    let (state, _) = spawn_state().await;
    state.sync.sync(&show_ids(), true).await.unwrap();

    // Upstream dropped episode 1002 and moved 1003 into its slot.
    let stats = state
        .sync
        .episode_store()
        .reconcile_season(
            ShowId::new(SHOW_ID),
            1,
            &[
                episode(1001, 1, 1, Some("2020-01-06")),
                episode(1003, 1, 2, Some("2020-01-13")),
            ],
        )
        .await
        .unwrap();

    assert_eq!(stats.removed, 1);
    assert_eq!(stats.updated, 1);

    let rows = state
        .store
        .get_episodes_for_show(ShowId::new(SHOW_ID))
        .await
        .unwrap();
    let holders: Vec<(i32, i32)> = rows
        .iter()
        .filter(|row| row.episode_id == 1003)
        .map(|row| (row.season_number, row.episode_number))
        .collect();
    assert_eq!(holders, [(1, 2)]);
    assert!(rows.iter().all(|row| row.episode_id != 1002));

    let marks = state
        .watch
        .toggle(ListId::new(LIST_ID), tv2cal::domain::EpisodeId::new(1003))
        .await
        .unwrap();
    assert_eq!(marks.len(), 1);
}

#[tokio::test]
async fn test_swapped_episode_ids_are_reassigned() {
    let (state, _) = spawn_state().await;
    state.sync.sync(&show_ids(), true).await.unwrap();

    state
        .sync
        .episode_store()
        .reconcile_season(
            ShowId::new(SHOW_ID),
            1,
            &[
                episode(1001, 1, 1, Some("2020-01-06")),
                episode(1003, 1, 2, Some("2020-01-13")),
                episode(1002, 1, 3, Some("2020-01-20")),
            ],
        )
        .await
        .unwrap();

    let rows = state
        .store
        .get_episodes_for_show(ShowId::new(SHOW_ID))
        .await
        .unwrap();
    let season_one: Vec<(i32, i64)> = rows
        .iter()
        .filter(|row| row.season_number == 1)
        .map(|row| (row.episode_number, row.episode_id))
        .collect();
    assert_eq!(season_one, [(1, 1001), (2, 1003), (3, 1002)]);
    assert_eq!(rows.len(), 7);
}

#[tokio::test]
async fn test_search_goes_through_catalog() {
    let (state, catalog) = spawn_state().await;

    let matches = state.catalog.search("example").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].show_id, ShowId::new(SHOW_ID));

    catalog.set_failing(true);
    assert!(state.catalog.search("example").await.is_err());
}
