//! Shared fixtures: an in-memory store and a scripted catalog.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, Set};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tv2cal::Config;
use tv2cal::clients::{CatalogClient, CatalogError};
use tv2cal::db::Store;
use tv2cal::domain::{EpisodeId, ShowId};
use tv2cal::entities::watch_lists;
use tv2cal::models::{FetchedEpisode, ShowMatch, ShowSummary};
use tv2cal::state::AppState;

pub const LIST_ID: i32 = 1;
pub const SHOW_ID: i32 = 100;

#[derive(Default)]
pub struct FakeCatalog {
    shows: Mutex<HashMap<ShowId, ShowSummary>>,
    seasons: Mutex<HashMap<(ShowId, i32), Vec<FetchedEpisode>>>,
    failing: AtomicBool,
    failing_season: Mutex<Option<i32>>,
    show_calls: AtomicUsize,
    season_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn add_show(&self, id: i32, name: &str, seasons: Vec<Vec<FetchedEpisode>>) {
        let show_id = ShowId::new(id);
        let season_count = i32::try_from(seasons.len()).unwrap();
        self.shows.lock().unwrap().insert(
            show_id,
            ShowSummary {
                name: name.to_string(),
                season_count,
                ended: false,
            },
        );
        let mut map = self.seasons.lock().unwrap();
        for (index, episodes) in seasons.into_iter().enumerate() {
            map.insert((show_id, i32::try_from(index).unwrap() + 1), episodes);
        }
    }

    pub fn set_season(&self, id: i32, season: i32, episodes: Vec<FetchedEpisode>) {
        self.seasons
            .lock()
            .unwrap()
            .insert((ShowId::new(id), season), episodes);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_season(&self, season: Option<i32>) {
        *self.failing_season.lock().unwrap() = season;
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    pub fn season_calls(&self) -> usize {
        self.season_calls.load(Ordering::SeqCst)
    }

    pub fn upstream_calls(&self) -> usize {
        self.show_calls() + self.season_calls()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn get_show(&self, show_id: ShowId) -> Result<ShowSummary, CatalogError> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        let endpoint = format!("tv/{show_id}");
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::unavailable(endpoint, "connection refused"));
        }
        self.shows
            .lock()
            .unwrap()
            .get(&show_id)
            .cloned()
            .ok_or_else(|| CatalogError::unavailable(endpoint, "HTTP 404 Not Found"))
    }

    async fn get_season(
        &self,
        show_id: ShowId,
        season_number: i32,
    ) -> Result<Vec<FetchedEpisode>, CatalogError> {
        self.season_calls.fetch_add(1, Ordering::SeqCst);
        let endpoint = format!("tv/{show_id}/season/{season_number}");
        if self.failing.load(Ordering::SeqCst)
            || *self.failing_season.lock().unwrap() == Some(season_number)
        {
            return Err(CatalogError::unavailable(endpoint, "timed out"));
        }
        Ok(self
            .seasons
            .lock()
            .unwrap()
            .get(&(show_id, season_number))
            .cloned()
            .unwrap_or_default())
    }

    async fn search(&self, query: &str) -> Result<Vec<ShowMatch>, CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::unavailable("search/tv", "connection refused"));
        }
        let query = query.to_lowercase();
        let mut matches: Vec<ShowMatch> = self
            .shows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, summary)| summary.name.to_lowercase().contains(&query))
            .map(|(show_id, summary)| ShowMatch {
                show_id: *show_id,
                name: summary.name.clone(),
                first_air_date: None,
                overview: String::new(),
                vote_count: 100,
            })
            .collect();
        matches.sort_by_key(|m| m.show_id);
        Ok(matches)
    }
}

pub fn episode(id: i64, season: i32, number: i32, air_date: Option<&str>) -> FetchedEpisode {
    FetchedEpisode {
        episode_id: EpisodeId::new(id),
        name: format!("Episode {number}"),
        season_number: season,
        episode_number: number,
        air_date: air_date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
    }
}

/// Show 100: three seasons, seven episodes, one not yet aired.
pub fn three_season_show() -> Vec<Vec<FetchedEpisode>> {
    vec![
        vec![
            episode(1001, 1, 1, Some("2020-01-06")),
            episode(1002, 1, 2, Some("2020-01-13")),
            episode(1003, 1, 3, Some("2020-01-20")),
        ],
        vec![
            episode(2001, 2, 1, Some("2021-03-01")),
            episode(2002, 2, 2, Some("2021-03-08")),
        ],
        vec![
            episode(3001, 3, 1, Some("2022-09-12")),
            episode(3002, 3, 2, Some("2099-09-19")),
        ],
    ]
}

pub async fn seed_list(store: &Store, id: i32, name: &str, shows: &[i32]) {
    watch_lists::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        shows: Set(serde_json::to_string(shows).unwrap()),
    }
    .insert(&store.conn)
    .await
    .unwrap();
}

pub async fn spawn_state() -> (AppState, Arc<FakeCatalog>) {
    let catalog = Arc::new(FakeCatalog::default());
    catalog.add_show(SHOW_ID, "The Example", three_season_show());

    let store = Store::new("sqlite::memory:")
        .await
        .expect("failed to open in-memory store");
    seed_list(&store, LIST_ID, "Weeknights", &[SHOW_ID]).await;

    let state = AppState::with_catalog(&Config::default(), store, catalog.clone())
        .expect("failed to build app state");
    (state, catalog)
}
