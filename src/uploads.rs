use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{error::AppResult, models::UploadedFile};

/// Writes uploaded thumbnails to a directory that is also served under
/// `/uploads`.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the file under a fresh name and returns it. Never replaces an
    /// existing file.
    pub async fn save(&self, file: &UploadedFile) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stored = stored_name(Uuid::new_v4(), &file.file_name);
        let mut out = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(&stored))
            .await?;
        out.write_all(&file.bytes).await?;
        out.flush().await?;

        tracing::debug!(stored = %stored, bytes = file.bytes.len(), "upload stored");
        Ok(stored)
    }

    pub async fn discard(&self, stored: &str) {
        if let Err(err) = tokio::fs::remove_file(self.dir.join(stored)).await {
            tracing::warn!(stored = %stored, error = %err, "failed to remove orphaned upload");
        }
    }
}

fn stored_name(id: Uuid, original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let mut clean: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if clean.trim_matches('.').is_empty() {
        clean = "upload".to_string();
    }
    format!("{id}-{clean}")
}
