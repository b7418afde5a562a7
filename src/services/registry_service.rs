//! Published registry reader.
//!
//! The canonical repository's working tree is the published registry: one
//! JSON file per registered service. This service only reads it; all
//! mutation flows go through the submission workflow.

use std::path::PathBuf;

use tokio::fs;

use crate::error::{AppError, Result};
use crate::models::service::RegisteredService;

pub struct RegistryService {
    services_dir: PathBuf,
}

impl RegistryService {
    pub fn new(services_dir: impl Into<PathBuf>) -> Self {
        Self {
            services_dir: services_dir.into(),
        }
    }

    /// Look up a published service by its assigned id.
    pub async fn find_by_id(&self, id: i64) -> Result<RegisteredService> {
        let mut entries = fs::read_dir(&self.services_dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot read registry: {e}")))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("cannot read registry: {e}")))?
        {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(body) = fs::read(&path).await else {
                continue;
            };
            match serde_json::from_slice::<RegisteredService>(&body) {
                Ok(service) if service.id == id => return Ok(service),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unparseable service file");
                }
            }
        }
        Err(AppError::NotFound(format!("no registered service with id {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn finds_service_by_id() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join("app-42.json"),
            r#"{"id": 42, "name": "app", "contacts": [{"email": "b@x.com"}]}"#,
        )
        .unwrap();
        std::fs::write(root.path().join("other-7.json"), r#"{"id": 7, "name": "other"}"#).unwrap();
        std::fs::write(root.path().join("notes.txt"), "not a service").unwrap();

        let registry = RegistryService::new(root.path());
        let svc = registry.find_by_id(42).await.unwrap();
        assert_eq!(svc.name, "app");
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let root = TempDir::new().unwrap();
        let registry = RegistryService::new(root.path());
        assert!(matches!(
            registry.find_by_id(99).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
