//! Local media storage for instrumento photos and marca logos.
//!
//! Files live under the configured media directory, split into
//! `instrumentos/` and `logotipos/`. The database stores paths relative to
//! that root.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const FOTOS_DIR: &str = "instrumentos";
const LOGOS_DIR: &str = "logotipos";

/// Filesystem wrapper for the media directory.
#[derive(Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Create the storage, ensuring both media subdirectories exist.
    pub fn new(config: &Config) -> AppResult<Self> {
        let root = PathBuf::from(&config.media_dir);
        for sub in [FOTOS_DIR, LOGOS_DIR] {
            std::fs::create_dir_all(root.join(sub)).map_err(|e| {
                AppError::Configuration(format!(
                    "Failed to create media directory {}/{}: {}",
                    root.display(),
                    sub,
                    e
                ))
            })?;
        }
        info!("Media storage initialized at {}", root.display());
        Ok(Self { root })
    }

    /// Save a photo for an instrumento. Returns the stored relative path.
    pub async fn save_foto(
        &self,
        instrumento_id: Uuid,
        ext: &str,
        data: &[u8],
    ) -> AppResult<String> {
        let rel = format!("{}/{}/{}.{}", FOTOS_DIR, instrumento_id, Uuid::now_v7(), ext);
        self.write_file(&rel, data).await?;
        Ok(rel)
    }

    /// Save a marca logo. Returns the stored relative path.
    pub async fn save_logotipo(&self, marca_nome: &str, ext: &str, data: &[u8]) -> AppResult<String> {
        let rel = format!(
            "{}/{}-{}.{}",
            LOGOS_DIR,
            slugify(marca_nome),
            &Uuid::now_v7().simple().to_string()[..8],
            ext
        );
        self.write_file(&rel, data).await?;
        Ok(rel)
    }

    async fn write_file(&self, rel: &str, data: &[u8]) -> AppResult<()> {
        let path = self.resolve(rel);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Database(format!("Failed to create media dir: {}", e)))?;
        }
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create media file: {}", e)))?;
        file.write_all(data)
            .await
            .map_err(|e| AppError::Database(format!("Failed to write media file: {}", e)))?;
        Ok(())
    }

    /// Remove a stored file. Best-effort: a failure is logged, never surfaced.
    pub async fn delete_file(&self, rel: &str) {
        let path = self.resolve(rel);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove media file {}: {}", path.display(), e);
        }
    }

    /// Remove an instrumento's photo directory and anything left inside it.
    /// Best-effort, like `delete_file`; a directory that never held a photo
    /// does not exist and is not an error.
    pub async fn delete_instrumento_dir(&self, instrumento_id: Uuid) {
        let path = self.root.join(FOTOS_DIR).join(instrumento_id.to_string());
        if let Err(e) = tokio::fs::remove_dir_all(&path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!("Failed to remove media directory {}: {}", path.display(), e);
        }
    }

    /// Absolute path for a stored relative path.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Media root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lowercase ASCII slug for filenames.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_replaces_non_alphanumerics() {
        assert_eq!(slugify("Fender"), "fender");
        assert_eq!(slugify("C. F. Martin & Co."), "c-f-martin-co");
        assert_eq!(slugify("  Gibson  "), "gibson");
    }

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage {
            root: dir.path().to_path_buf(),
        };

        let rel = storage
            .save_logotipo("Fender", "png", b"fake-bytes")
            .await
            .unwrap();
        assert!(rel.starts_with("logotipos/fender-"));
        assert!(storage.resolve(&rel).exists());

        storage.delete_file(&rel).await;
        assert!(!storage.resolve(&rel).exists());
    }

    #[tokio::test]
    async fn delete_instrumento_dir_removes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage {
            root: dir.path().to_path_buf(),
        };

        let id = Uuid::now_v7();
        let rel = storage.save_foto(id, "jpg", b"fake-bytes").await.unwrap();
        let instrumento_dir = storage.root().join("instrumentos").join(id.to_string());
        assert!(storage.resolve(&rel).exists());
        assert!(instrumento_dir.exists());

        storage.delete_instrumento_dir(id).await;
        assert!(!instrumento_dir.exists());

        // Deleting again is a no-op rather than an error.
        storage.delete_instrumento_dir(id).await;
    }
}
