// src/store/mod.rs

pub mod material_repo;
pub mod result_repo;
pub mod test_repo;
pub mod user_directory;

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::error::AppError;

/// One-directory JSON document store: each document is a single
/// `<id>.json` file.
///
/// Writes are atomic per document: the new content goes to a temp file in
/// the same directory and is renamed over the target, so a concurrent
/// reader always sees one complete JSON value. Concurrent writes to the
/// same id are last-write-wins; there is no detection and no cross-document
/// transaction.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Document ids become file names, so they must not traverse out of the
    /// store directory.
    fn path_for(&self, id: &str) -> Result<PathBuf, AppError> {
        if id.is_empty()
            || id.contains('/')
            || id.contains('\\')
            || id.contains("..")
        {
            return Err(AppError::BadRequest("Invalid document id".to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    pub async fn put<T: Serialize>(&self, id: &str, doc: &T) -> Result<(), AppError> {
        let path = self.path_for(id)?;
        let bytes = serde_json::to_vec_pretty(doc)?;

        let tmp = self
            .dir
            .join(format!(".{}.json.tmp-{}", id, uuid::Uuid::new_v4()));
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            // Don't leave the orphaned temp file behind.
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, AppError> {
        let path = self.path_for(id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Returns `true` if a document was removed, `false` if none existed.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerates and deserializes every document in the store. O(n), no
    /// index. Documents that fail to deserialize are logged and skipped
    /// rather than failing the whole listing.
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, AppError> {
        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_doc = path.extension().is_some_and(|ext| ext == "json")
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| !name.starts_with('.'));
            if !is_doc {
                continue;
            }

            let bytes = fs::read(&path).await?;
            match serde_json::from_slice(&bytes) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!("Skipping unreadable document {:?}: {}", path, e);
                }
            }
        }

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        id: String,
        value: u32,
    }

    async fn temp_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("docs")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let (_dir, store) = temp_store().await;
        let doc = Doc {
            id: "a".to_string(),
            value: 7,
        };

        store.put("a", &doc).await.unwrap();
        let loaded: Doc = store.get("a").await.unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (_dir, store) = temp_store().await;
        let loaded: Option<Doc> = store.get("nope").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let (_dir, store) = temp_store().await;
        let first = Doc {
            id: "a".to_string(),
            value: 1,
        };
        let second = Doc {
            id: "a".to_string(),
            value: 2,
        };

        store.put("a", &first).await.unwrap();
        store.put("a", &second).await.unwrap();

        let loaded: Doc = store.get("a").await.unwrap().unwrap();
        assert_eq!(loaded.value, 2);
        let all: Vec<Doc> = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let (_dir, store) = temp_store().await;
        let doc = Doc {
            id: "a".to_string(),
            value: 1,
        };
        store.put("a", &doc).await.unwrap();

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        let loaded: Option<Doc> = store.get("a").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn rejects_traversal_ids() {
        let (_dir, store) = temp_store().await;
        let doc = Doc {
            id: "x".to_string(),
            value: 1,
        };
        assert!(store.put("../escape", &doc).await.is_err());
        assert!(store.get::<Doc>("a/b").await.is_err());
    }

    #[tokio::test]
    async fn concurrent_rewrites_never_expose_partial_documents() {
        let (_dir, store) = temp_store().await;
        store
            .put(
                "a",
                &Doc {
                    id: "a".to_string(),
                    value: 0,
                },
            )
            .await
            .unwrap();

        let writer = {
            let store = store.clone();
            async move {
                for value in 1..=200 {
                    store
                        .put(
                            "a",
                            &Doc {
                                id: "a".to_string(),
                                value,
                            },
                        )
                        .await
                        .unwrap();
                }
            }
        };

        let reader = {
            let store = store.clone();
            async move {
                for _ in 0..200 {
                    // Every read racing the rewrites must deserialize: a
                    // partial document would fail here.
                    let doc: Doc = store.get("a").await.unwrap().expect("document must exist");
                    assert_eq!(doc.id, "a");

                    let all: Vec<Doc> = store.list().await.unwrap();
                    assert_eq!(all.len(), 1);
                }
            }
        };

        tokio::join!(writer, reader);
    }

    #[tokio::test]
    async fn list_skips_temp_files() {
        let (_dir, store) = temp_store().await;
        let doc = Doc {
            id: "a".to_string(),
            value: 1,
        };
        store.put("a", &doc).await.unwrap();
        tokio::fs::write(store.dir().join(".b.json.tmp-x"), b"{")
            .await
            .unwrap();

        let all: Vec<Doc> = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
