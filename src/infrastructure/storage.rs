use crate::config::AppConfig;
use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<LocalStorageService>> {
    tokio::fs::create_dir_all(&config.storage_base_path).await?;
    info!("Local storage root: {}", config.storage_base_path);

    Ok(Arc::new(LocalStorageService::new(
        config.storage_base_path.clone(),
        config.public_base_url.clone(),
    )))
}
