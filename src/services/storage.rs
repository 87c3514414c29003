use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Persist `data` under `sub_directory`, returning the stored relative path.
    async fn save(&self, data: &[u8], sub_directory: &str, original_name: &str) -> Result<String>;
    async fn delete(&self, relative_path: &str) -> Result<()>;
    async fn read(&self, relative_path: &str) -> Result<Vec<u8>>;
    /// Map a stored relative path to a URL a browser can fetch.
    fn public_url(&self, relative_path: &str) -> String;
}

pub struct LocalStorageService {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Generated names are unique per call, so concurrent saves never collide.
    fn generate_file_name(original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();

        format!(
            "{}_{}{}",
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            Uuid::new_v4().simple(),
            extension
        )
    }

    fn absolute_path(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path.trim_start_matches('/'))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn save(&self, data: &[u8], sub_directory: &str, original_name: &str) -> Result<String> {
        let file_name = Self::generate_file_name(original_name);
        let relative_path = format!("{}/{}", sub_directory.trim_matches('/'), file_name);

        let absolute_path = self.absolute_path(&relative_path);
        if let Some(parent) = absolute_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute_path, data).await?;

        Ok(relative_path)
    }

    async fn delete(&self, relative_path: &str) -> Result<()> {
        if relative_path.trim().is_empty() {
            return Ok(());
        }

        let absolute_path = self.absolute_path(relative_path);
        match tokio::fs::remove_file(&absolute_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.absolute_path(relative_path)).await?)
    }

    fn public_url(&self, relative_path: &str) -> String {
        if relative_path.trim().is_empty() {
            return String::new();
        }

        if self.public_base_url.trim().is_empty() {
            return format!("/{}", relative_path.trim_start_matches('/'));
        }

        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            relative_path.trim_start_matches('/')
        )
    }
}
