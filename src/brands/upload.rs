// Logo file placement for brand uploads

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::ApiError;

/// Writes uploaded logos into the public upload directory
#[derive(Debug, Clone)]
pub struct LogoStorage {
    dir: PathBuf,
}

impl LogoStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Place an uploaded file on disk and return its final path
    ///
    /// The bytes land under a random name first, then the file is renamed to
    /// `<random>_<original name>`.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let staged = self.dir.join(random_name());
        tokio::fs::write(&staged, bytes).await?;

        let mut final_name = staged.as_os_str().to_owned();
        final_name.push("_");
        final_name.push(sanitize_file_name(original_name));
        let final_path = PathBuf::from(final_name);

        tokio::fs::rename(&staged, &final_path).await?;
        tracing::debug!("Stored upload at {}", final_path.display());
        Ok(final_path)
    }

    /// Remove a stored file that ended up unreferenced
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Could not remove orphaned upload {}: {}", path.display(), e);
        }
    }
}

/// 32 hex characters
fn random_name() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Keep only the final path component of a client supplied name
fn sanitize_file_name(name: &str) -> String {
    Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("logo")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> LogoStorage {
        LogoStorage::new(std::env::temp_dir().join(format!("garage-upload-{}", random_name())))
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("ford.png"), "ford.png");
        assert_eq!(sanitize_file_name(""), "logo");
        assert_eq!(sanitize_file_name(".."), "logo");
    }

    #[test]
    fn test_random_name_shape() {
        let name = random_name();
        assert_eq!(name.len(), 32);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_store_renames_with_original_name() {
        let storage = temp_storage();
        let path = storage.store("ford.png", b"png-bytes").await.unwrap();

        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.ends_with("_ford.png"));
        assert_eq!(path.parent().unwrap(), storage.dir());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");

        // Only the renamed file remains
        let mut entries = tokio::fs::read_dir(storage.dir()).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);

        let _ = tokio::fs::remove_dir_all(storage.dir()).await;
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let storage = temp_storage();
        let path = storage.store("seat.svg", b"<svg/>").await.unwrap();

        storage.discard(&path).await;
        assert!(tokio::fs::metadata(&path).await.is_err());

        let _ = tokio::fs::remove_dir_all(storage.dir()).await;
    }
}
