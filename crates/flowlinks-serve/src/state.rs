//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::store::{ClickHouseLinkStore, LinkStore};
use crate::templates::Templates;

/// Shared application state available to all request handlers.
///
/// Everything in here is immutable or internally synchronized; requests never
/// share mutable state with each other.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Where link records are looked up.
    pub store: Arc<dyn LinkStore>,

    /// HTML templates for the landing and not-found pages.
    pub templates: Templates,
}

impl AppState {
    /// Create application state backed by ClickHouse.
    pub fn new(config: Config) -> Self {
        let store = ClickHouseLinkStore::from_config(&config);
        Self::with_store(config, Arc::new(store))
    }

    /// Create application state with an explicit link store.
    pub fn with_store(config: Config, store: Arc<dyn LinkStore>) -> Self {
        let templates = Templates::from_dir(config.template_dir.clone());

        tracing::info!(
            templates = ?templates.source(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            store,
            templates,
        }
    }
}
