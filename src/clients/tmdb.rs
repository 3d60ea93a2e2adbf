use crate::clients::{CatalogClient, CatalogError};
use crate::config::CatalogConfig;
use crate::domain::{EpisodeId, ShowId};
use crate::models::{FetchedEpisode, ShowMatch, ShowSummary};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ENDED_STATUS: &str = "Ended";

/// Search hits with this many votes or fewer are mostly empty stubs.
const MIN_SEARCH_VOTES: i64 = 10;

// tv/{id}
#[derive(Debug, Deserialize)]
struct TmdbShow {
    name: String,
    #[serde(default)]
    number_of_seasons: Option<i32>,
    #[serde(default)]
    status: Option<String>,
}

// tv/{id}/season/{n}
#[derive(Debug, Deserialize)]
struct TmdbSeason {
    #[serde(default)]
    episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisode {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    season_number: i32,
    episode_number: i32,
    #[serde(default)]
    air_date: Option<String>,
}

// search/tv
#[derive(Debug, Deserialize)]
struct TmdbSearchPage {
    #[serde(default)]
    results: Vec<TmdbSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResult {
    id: i32,
    name: String,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    vote_count: i64,
}

impl From<TmdbSearchResult> for ShowMatch {
    fn from(result: TmdbSearchResult) -> Self {
        Self {
            show_id: ShowId::new(result.id),
            name: result.name,
            first_air_date: result.first_air_date.as_deref().and_then(parse_air_date),
            overview: result.overview.unwrap_or_default(),
            vote_count: result.vote_count,
        }
    }
}

fn search_matches(page: TmdbSearchPage) -> Vec<ShowMatch> {
    page.results
        .into_iter()
        .filter(|result| result.vote_count > MIN_SEARCH_VOTES)
        .map(Into::into)
        .collect()
}

impl From<TmdbShow> for ShowSummary {
    fn from(show: TmdbShow) -> Self {
        Self {
            name: show.name,
            season_count: show.number_of_seasons.unwrap_or(0).max(0),
            ended: show.status.as_deref() == Some(ENDED_STATUS),
        }
    }
}

impl From<TmdbEpisode> for FetchedEpisode {
    fn from(ep: TmdbEpisode) -> Self {
        Self {
            episode_id: EpisodeId::new(ep.id),
            name: ep.name.unwrap_or_default(),
            season_number: ep.season_number,
            episode_number: ep.episode_number,
            air_date: ep.air_date.as_deref().and_then(parse_air_date),
        }
    }
}

/// TMDB sends `""` or `null` for unannounced dates.
fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Client for the TMDB v3 TV endpoints.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build catalog HTTP client")?;

        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &CatalogConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::unavailable(path, e))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .extend_pairs(query);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        self.get_json_with(path, &[]).await
    }

    async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path, query)?;
        debug!(endpoint = path, "Querying catalog");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::unavailable(path, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::unavailable(path, format!("HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::unavailable(path, e.without_url()))
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).with_context(|| format!("Invalid catalog base URL: {raw}"))
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn get_show(&self, show_id: ShowId) -> Result<ShowSummary, CatalogError> {
        let show: TmdbShow = self.get_json(&format!("tv/{show_id}")).await?;
        Ok(show.into())
    }

    async fn get_season(
        &self,
        show_id: ShowId,
        season_number: i32,
    ) -> Result<Vec<FetchedEpisode>, CatalogError> {
        let season: TmdbSeason = self
            .get_json(&format!("tv/{show_id}/season/{season_number}"))
            .await?;

        Ok(season.episodes.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<ShowMatch>, CatalogError> {
        let page: TmdbSearchPage = self.get_json_with("search/tv", &[("query", query)]).await?;
        Ok(search_matches(page))
    }
}
