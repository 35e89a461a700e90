use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Stores uploaded files below the configured media root. Paths handed in and
/// out are relative to that root.
#[derive(Debug, Clone)]
pub struct ImageService {
    media_root: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Absolute location of a stored file.
    #[must_use]
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.media_root.join(relative_path)
    }

    pub async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<()> {
        let file_path = self.resolve(relative_path);

        if let Some(dir) = file_path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        info!(path = %file_path.display(), size = bytes.len(), "Image stored");
        Ok(())
    }

    /// Removes a stored file. A file that is already gone is not an error and
    /// other failures are only logged.
    pub async fn remove(&self, relative_path: &str) {
        let file_path = self.resolve(relative_path);
        match fs::remove_file(&file_path).await {
            Ok(()) => info!(path = %file_path.display(), "Image removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %file_path.display(), error = %e, "Failed to remove image"),
        }
    }
}
