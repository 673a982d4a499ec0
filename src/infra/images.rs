use std::path::PathBuf;

use tokio::fs;
use tracing::warn;

use crate::error::ApiError;

/// Prefix stored in the `image` column of a recipe row. Relative to the
/// public directory served as static files.
pub const RECIPE_IMAGE_PREFIX: &str = "images/recipes";

#[derive(Clone)]
pub struct ImageStore {
    public_dir: PathBuf,
}

impl ImageStore {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        ImageStore {
            public_dir: public_dir.into(),
        }
    }

    fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(RECIPE_IMAGE_PREFIX)
    }

    /// Writes an uploaded image under the public directory and returns
    /// the relative path persisted in the recipe row.
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let name = sanitize_file_name(file_name)
            .ok_or_else(|| ApiError::BadRequest("Invalid file name".into()))?;
        let dir = self.upload_dir();
        fs::create_dir_all(&dir).await.map_err(ApiError::internal)?;
        fs::write(dir.join(&name), bytes)
            .await
            .map_err(ApiError::internal)?;
        Ok(format!("{RECIPE_IMAGE_PREFIX}/{name}"))
    }

    /// Removes the file behind a stored image path. A blank path is a
    /// no-op and a missing file only logs a warning.
    pub async fn remove(&self, stored_path: &str) -> Result<(), ApiError> {
        if stored_path.trim().is_empty() {
            return Ok(());
        }
        let Some(name) = sanitize_file_name(stored_path) else {
            return Ok(());
        };
        let path = self.upload_dir().join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("image not found for deletion: {}", path.display());
                Ok(())
            }
            Err(err) => Err(ApiError::internal(err)),
        }
    }
}

// Client-provided names may carry directory components; only the final
// path component is kept.
fn sanitize_file_name(raw: &str) -> Option<String> {
    let normalized = raw.replace('\\', "/");
    let name = normalized.rsplit('/').next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(label: &str) -> ImageStore {
        let dir = std::env::temp_dir()
            .join("circo-image-store-tests")
            .join(format!("{label}-{}", std::process::id()));
        ImageStore::new(dir)
    }

    #[test]
    fn sanitize_keeps_the_final_component() {
        assert_eq!(
            sanitize_file_name("images/recipes/cake.jpg").as_deref(),
            Some("cake.jpg")
        );
        assert_eq!(
            sanitize_file_name("..\\..\\evil.png").as_deref(),
            Some("evil.png")
        );
        assert_eq!(sanitize_file_name("tart.png").as_deref(), Some("tart.png"));
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("   "), None);
        assert_eq!(sanitize_file_name("images/recipes/"), None);
        assert_eq!(sanitize_file_name(".."), None);
    }

    #[tokio::test]
    async fn store_then_remove_round_trips() {
        let store = scratch_store("round-trip");
        let stored = store
            .store("cake.jpg", b"not really a jpeg")
            .await
            .expect("store should succeed");
        assert_eq!(stored, "images/recipes/cake.jpg");

        store
            .remove(&stored)
            .await
            .expect("remove should succeed");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files_and_blank_paths() {
        let store = scratch_store("missing");
        store
            .remove("images/recipes/never-uploaded.png")
            .await
            .expect("missing file should not be an error");
        store.remove("").await.expect("blank path is a no-op");
    }

    #[tokio::test]
    async fn store_rejects_directory_only_names() {
        let store = scratch_store("invalid-name");
        let err = store
            .store("images/recipes/", b"bytes")
            .await
            .expect_err("directory-only name should be rejected");
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
