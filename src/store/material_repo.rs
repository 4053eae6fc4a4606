// src/store/material_repo.rs

use std::path::PathBuf;

use super::JsonStore;
use crate::{error::AppError, models::material::Material};

/// Persists uploaded study material: metadata as one document per material
/// under `<data_dir>/materials`, file bytes under
/// `<data_dir>/materials/files`.
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    store: JsonStore,
    files_dir: PathBuf,
}

impl MaterialRepository {
    pub async fn open(data_dir: &str) -> Result<Self, AppError> {
        let base = std::path::Path::new(data_dir).join("materials");
        let files_dir = base.join("files");
        tokio::fs::create_dir_all(&files_dir).await?;
        let store = JsonStore::open(base).await?;
        Ok(Self { store, files_dir })
    }

    /// Stores the file bytes and the metadata document. The stored file name
    /// is prefixed with the material id so uploads never clobber each other.
    pub async fn create(&self, material: &Material, bytes: &[u8]) -> Result<(), AppError> {
        let file_path = self
            .files_dir
            .join(format!("{}-{}", material.id, material.filename));
        tokio::fs::write(&file_path, bytes).await?;
        self.store.put(&material.id, material).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Material>, AppError> {
        self.store.get(id).await
    }

    /// Reads the stored file bytes for a material, `None` if the file is
    /// gone from disk.
    pub async fn read_file(&self, material: &Material) -> Result<Option<Vec<u8>>, AppError> {
        let file_path = self
            .files_dir
            .join(format!("{}-{}", material.id, material.filename));
        match tokio::fs::read(&file_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All material metadata, newest upload first.
    pub async fn list(&self) -> Result<Vec<Material>, AppError> {
        let mut materials: Vec<Material> = self.store.list().await?;
        materials.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(materials)
    }
}
