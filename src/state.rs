use std::sync::Arc;

use crate::clients::CatalogClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    DashboardService, FeedService, ListStore, SyncOrchestrator, WatchState,
};

/// Services wired from one configuration. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub catalog: Arc<dyn CatalogClient>,

    pub sync: Arc<SyncOrchestrator>,

    pub watch: Arc<WatchState>,

    pub feed: Arc<FeedService>,

    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Store::new(&config.general.database_path).await?;
        let catalog = Arc::new(TmdbClient::new(&config.catalog)?);
        Self::with_catalog(config, store, catalog)
    }

    /// Wires services around an existing store and catalog.
    pub fn with_catalog(
        config: &Config,
        store: Store,
        catalog: Arc<dyn CatalogClient>,
    ) -> anyhow::Result<Self> {
        let policy = config.cache.policy()?;
        let lists: Arc<dyn ListStore> = Arc::new(store.clone());

        let sync = Arc::new(SyncOrchestrator::new(store.clone(), catalog.clone(), policy));
        let watch = Arc::new(WatchState::new(store.clone(), lists.clone(), policy));
        let feed = Arc::new(FeedService::new(sync.clone(), lists.clone()));
        let dashboard = Arc::new(DashboardService::new(
            sync.clone(),
            watch.clone(),
            lists,
            policy,
        ));

        Ok(Self {
            store,
            catalog,
            sync,
            watch,
            feed,
            dashboard,
        })
    }
}
