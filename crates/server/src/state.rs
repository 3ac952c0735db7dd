use std::sync::Arc;

use showtime_catalog::provider::CatalogProvider;

use crate::config::SearchConfig;
use crate::search::SearchService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, config: SearchConfig) -> Self {
        let search = Arc::new(SearchService::new(catalog.clone(), config));
        Self { catalog, search }
    }
}
