//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything here is built once at startup and
//! cheap to clone.

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;
use stockpile_schema::{RegistryError, SchemaRegistry};

use crate::config::AppConfig;
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Item use cases.
    pub items: ItemService,
    /// Request schemas the service validates against.
    pub schemas: Arc<SchemaRegistry>,
    /// Runtime configuration.
    pub config: Arc<AppConfig>,
    /// When the process started serving.
    pub started_at: Instant,
    /// Prometheus renderer, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Default configuration on an empty in-memory repository.
    ///
    /// # Panics
    ///
    /// Panics if the standard schema registry contains a duplicate name.
    /// Startup code uses [`AppState::with_config`] and handles the error.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), ItemRepository::in_memory())
            .expect("standard schema registry has unique names")
    }

    /// State for `config` backed by `repository`.
    pub fn with_config(
        config: AppConfig,
        repository: ItemRepository,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            items: ItemService::new(repository),
            schemas: Arc::new(SchemaRegistry::standard()?),
            config: Arc::new(config),
            started_at: Instant::now(),
            metrics: None,
        })
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn repository(&self) -> &ItemRepository {
        self.items.repository()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("repository", &self.repository().kind())
            .field("schemas", &self.schemas.len())
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
