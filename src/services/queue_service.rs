//! Submission queue store.
//!
//! A directory holding one file per pending non-versioned request. Each
//! record carries an out-of-band `original_author` attribute written as a
//! sidecar file next to the record (filesystem extended attributes are not
//! portable). The attribute is read back bounded to [`MAX_AUTHOR_LEN`]
//! bytes; payloads beyond the bound read back truncated.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::review::{PendingRecord, SubmissionKind};
use crate::models::service::RegisteredService;
use crate::models::user::{SubmitterIdentity, UserProfile};

/// Upper bound on the stored author attribute, in bytes.
pub const MAX_AUTHOR_LEN: usize = 100;

/// Directory-backed staging area for pending submission records.
pub struct QueueService {
    dir: PathBuf,
}

impl QueueService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the queue directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create submissions dir: {e}")))?;
        Ok(())
    }

    /// Resolve a record name to its file and sidecar paths. Rejects names
    /// that would escape the queue directory or collide with sidecars.
    fn checked(&self, name: &str) -> Result<(PathBuf, PathBuf)> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(AppError::InvalidRequest(format!(
                "invalid submission file name: {name}"
            )));
        }
        let record = self.dir.join(name);
        let sidecar = self.dir.join(format!(".{name}.author"));
        Ok((record, sidecar))
    }

    /// Create a new record, failing if one with the same name exists, and
    /// tag it with the submitter's identity.
    pub async fn create(&self, name: &str, body: &[u8], submitter: &UserProfile) -> Result<()> {
        let (record, sidecar) = self.checked(name)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&record)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {name}: {e}")))?;
        file.write_all(body)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {name}: {e}")))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {name}: {e}")))?;
        self.write_author(&sidecar, submitter).await
    }

    /// Write a record, replacing any existing content, and tag it with the
    /// submitter's identity.
    pub async fn write(&self, name: &str, body: &[u8], submitter: &UserProfile) -> Result<()> {
        let (record, sidecar) = self.checked(name)?;
        fs::write(&record, body)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {name}: {e}")))?;
        self.write_author(&sidecar, submitter).await
    }

    async fn write_author(&self, sidecar: &Path, submitter: &UserProfile) -> Result<()> {
        fs::write(sidecar, SubmitterIdentity::encode(submitter).as_bytes())
            .await
            .map_err(|e| AppError::Storage(format!("cannot write author attribute: {e}")))?;
        Ok(())
    }

    /// Read the recorded submitter of a record.
    ///
    /// This is the one place errors are swallowed: an unreadable attribute
    /// degrades to the empty identity, which matches no caller. Logged for
    /// operators.
    pub async fn read_author(&self, name: &str) -> SubmitterIdentity {
        match self.try_read_author(name).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!(record = name, error = %e, "Failed to read submitter attribute");
                SubmitterIdentity::default()
            }
        }
    }

    async fn try_read_author(&self, name: &str) -> Result<SubmitterIdentity> {
        let (_, sidecar) = self.checked(name)?;
        let mut bytes = fs::read(&sidecar).await?;
        bytes.truncate(MAX_AUTHOR_LEN);
        Ok(SubmitterIdentity::decode(&String::from_utf8_lossy(&bytes)))
    }

    /// Delete a record and its author sidecar.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let (record, sidecar) = self.checked(name)?;
        fs::remove_file(&record).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("no pending submission {name}"))
            } else {
                AppError::Storage(format!("cannot delete {name}: {e}"))
            }
        })?;
        // The record is gone; a dangling sidecar is harmless.
        let _ = fs::remove_file(&sidecar).await;
        Ok(())
    }

    /// Enumerate pending records with their kind, service name, and
    /// submitter, ordered by file name.
    pub async fn list(&self) -> Result<Vec<PendingRecord>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot list submissions dir: {e}")))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("cannot list submissions dir: {e}")))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_file() {
                continue;
            }
            names.push(name);
        }
        names.sort();

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let service_name = fs::read(self.dir.join(&name))
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<RegisteredService>(&body).ok())
                .map(|svc| svc.name);
            records.push(PendingRecord {
                kind: SubmissionKind::from_filename(&name),
                submitter: self.read_author(&name).await,
                service_name,
                filename: name,
            });
        }
        Ok(records)
    }

    /// Number of pending records. Degrades to zero when the directory
    /// cannot be read, matching the dashboard counter's tolerant contract.
    pub async fn count(&self) -> usize {
        self.list().await.map(|r| r.len()).unwrap_or(0)
    }
}
