use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::config::normalize_content_type;
use crate::errors::{Result, ThumbnailError};
use crate::models::StoredThumbnail;

use super::ThumbnailStore;

/// Filesystem-backed thumbnail store.
///
/// One file per thumbnail, named `<id>.<ext>` directly under the storage
/// root. There is no index; existence and content-type come from the
/// directory listing and the extension.
#[derive(Clone)]
pub struct LocalThumbnailStore {
    root: PathBuf,
}

impl LocalThumbnailStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn ensure_storage_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await.map_err(|e| {
                ThumbnailError::storage(format!(
                    "unable to create storage root {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }

    /// Locate the stored file for `id`, whatever extension it was saved
    /// with. Identifiers are fixed-length, so stem equality can never match
    /// more than one object per saved extension.
    async fn find_by_id(&self, id: &str) -> Result<Option<PathBuf>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ThumbnailError::storage(format!(
                    "failed to list storage root {}: {e}",
                    self.root.display()
                )))
            }
        };

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            ThumbnailError::storage(format!(
                "failed to list storage root {}: {e}",
                self.root.display()
            ))
        })? {
            let path = entry.path();
            if path.file_stem().and_then(|stem| stem.to_str()) == Some(id) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

fn ext_from_content_type(content_type: &str) -> &'static str {
    match normalize_content_type(content_type).as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn content_type_from_ext(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Generated identifiers are 32 lowercase hex characters (a UUID v4 without
/// hyphens). Fixed length means no identifier is a prefix of another, and
/// the character set leaves no room for path separators or `..`.
fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[async_trait]
impl ThumbnailStore for LocalThumbnailStore {
    async fn save(
        &self,
        content: &[u8],
        content_type: &str,
        original_filename: Option<&str>,
    ) -> Result<StoredThumbnail> {
        self.ensure_storage_root().await?;

        let id = Uuid::new_v4().simple().to_string();
        let ext = ext_from_content_type(content_type);
        let file_name = format!("{id}.{ext}");
        let target_path = self.root.join(&file_name);
        let tmp_path = self.root.join(format!("{file_name}.tmp"));

        // Write to a temp file first and publish with a rename, so a
        // concurrent reader can never observe a half-written object under
        // the final name.
        if let Err(e) = fs::write(&tmp_path, content).await {
            return Err(ThumbnailError::storage(format!(
                "failed to write thumbnail to {}: {e}",
                tmp_path.display()
            )));
        }
        if let Err(e) = fs::rename(&tmp_path, &target_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ThumbnailError::storage(format!(
                "failed to publish thumbnail at {}: {e}",
                target_path.display()
            )));
        }

        Ok(StoredThumbnail {
            id,
            path: target_path,
            content_type: normalize_content_type(content_type),
            original_filename: original_filename.map(str::to_string),
        })
    }

    async fn open(&self, id: &str) -> Result<(StoredThumbnail, Vec<u8>)> {
        // Anything that is not a well-formed generated identifier was never
        // issued by this store; refuse it before forming any path.
        if !is_valid_id(id) {
            return Err(ThumbnailError::not_found(id));
        }

        let path = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ThumbnailError::not_found(id))?;

        let data = fs::read(&path).await.map_err(|e| {
            ThumbnailError::storage(format!(
                "failed to read thumbnail from {}: {e}",
                path.display()
            ))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let record = StoredThumbnail {
            id: id.to_string(),
            content_type: content_type_from_ext(ext).to_string(),
            path,
            original_filename: None,
        };
        Ok((record, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> LocalThumbnailStore {
        LocalThumbnailStore::new(tmp.path().to_path_buf())
    }

    #[tokio::test]
    async fn save_then_open_round_trips_content_and_type() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let saved = store
            .save(b"png payload", "image/png", Some("photo.png"))
            .await
            .unwrap();
        assert_eq!(saved.content_type, "image/png");
        assert_eq!(saved.original_filename.as_deref(), Some("photo.png"));

        let (record, data) = store.open(&saved.id).await.unwrap();
        assert_eq!(data, b"png payload");
        assert_eq!(record.content_type, "image/png");
        assert_eq!(record.id, saved.id);
        assert_eq!(record.original_filename, None);
    }

    #[tokio::test]
    async fn open_unknown_identifier_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let id = Uuid::new_v4().simple().to_string();
        let result = store.open(&id).await;
        assert!(matches!(result, Err(ThumbnailError::NotFound { .. })));
    }

    #[tokio::test]
    async fn open_rejects_path_traversal_identifiers() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        for id in ["../../etc/passwd", "..", "a/b", "", "ABCDEF"] {
            let result = store.open(id).await;
            assert!(
                matches!(result, Err(ThumbnailError::NotFound { .. })),
                "id {id:?} should be refused"
            );
        }
    }

    #[tokio::test]
    async fn open_by_identifier_prefix_misses() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let saved = store.save(b"x", "image/png", None).await.unwrap();
        let prefix = &saved.id[..16];
        assert!(matches!(
            store.open(prefix).await,
            Err(ThumbnailError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files_behind() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        store.save(b"one", "image/png", None).await.unwrap();
        store.save(b"two", "image/webp", None).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn save_creates_missing_storage_root() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("deeper").join("root");
        let store = LocalThumbnailStore::new(nested.clone());

        let saved = store.save(b"payload", "image/png", None).await.unwrap();
        assert!(nested.join(format!("{}.png", saved.id)).exists());
    }

    #[test]
    fn extension_mapping_is_symmetric_for_known_types() {
        for ct in ["image/png", "image/jpeg", "image/webp"] {
            let ext = ext_from_content_type(ct);
            assert_eq!(content_type_from_ext(ext), ct);
        }
        assert_eq!(ext_from_content_type("text/plain"), "bin");
        assert_eq!(content_type_from_ext("bin"), "application/octet-stream");
    }
}
