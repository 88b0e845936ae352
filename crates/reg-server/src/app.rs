//! Router assembly and shared request state.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::trace::TraceLayer;

use reg_config::{RegistrarConfig, StorageConfig};
use reg_db::service::RegService;
use reg_storage::UploadStore;

use crate::handlers::register_student;

/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/api/students/register/";

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub service: RegService,
    pub uploads: UploadStore,
    pub storage: StorageConfig,
}

impl AppState {
    pub const fn new(service: RegService, uploads: UploadStore, storage: StorageConfig) -> Self {
        Self {
            service,
            uploads,
            storage,
        }
    }

    /// Open the database and upload store named by `config`.
    ///
    /// # Errors
    ///
    /// Fails if either store cannot be opened.
    pub async fn init(config: &RegistrarConfig) -> anyhow::Result<Self> {
        let service = RegService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let uploads = UploadStore::from_config(&config.storage, &config.s3)
            .await
            .context("failed to initialize upload storage")?;
        Ok(Self::new(service, uploads, config.storage.clone()))
    }
}

pub fn build_router(app_state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(REGISTER_PATH, post(register_student))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
