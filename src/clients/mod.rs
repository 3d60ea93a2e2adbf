//! Upstream metadata providers.
//!
//! The sync engine only depends on [`CatalogClient`]; [`tmdb::TmdbClient`] is
//! the production implementation.

pub mod tmdb;

pub use tmdb::TmdbClient;

use crate::domain::ShowId;
use crate::models::{FetchedEpisode, ShowMatch, ShowSummary};
use thiserror::Error;

/// Failure talking to the catalog. Network errors, timeouts, non-success
/// statuses and undecodable payloads all collapse into this one case.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable ({endpoint}): {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },
}

impl CatalogError {
    pub fn unavailable(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

/// Source of show and episode metadata.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the show summary (name, season count, ended flag).
    async fn get_show(&self, show_id: ShowId) -> Result<ShowSummary, CatalogError>;

    /// Fetches every episode record of one season.
    async fn get_season(
        &self,
        show_id: ShowId,
        season_number: i32,
    ) -> Result<Vec<FetchedEpisode>, CatalogError>;

    /// Finds shows by title. Low-signal results are already filtered out.
    async fn search(&self, query: &str) -> Result<Vec<ShowMatch>, CatalogError>;
}
