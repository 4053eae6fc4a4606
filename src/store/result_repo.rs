// src/store/result_repo.rs

use super::JsonStore;
use crate::{error::AppError, models::result::TestResult};

/// Persists graded attempts one document per result under
/// `<data_dir>/results`. Results are written once and never mutated.
///
/// Who may read a result is decided by the calling handler, not here.
#[derive(Debug, Clone)]
pub struct ResultRepository {
    store: JsonStore,
}

impl ResultRepository {
    pub async fn open(data_dir: &str) -> Result<Self, AppError> {
        let store = JsonStore::open(std::path::Path::new(data_dir).join("results")).await?;
        Ok(Self { store })
    }

    pub async fn create(&self, result: &TestResult) -> Result<(), AppError> {
        self.store.put(&result.id, result).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<TestResult>, AppError> {
        self.store.get(id).await
    }

    /// One student's attempts, newest first.
    pub async fn list_by_student(&self, username: &str) -> Result<Vec<TestResult>, AppError> {
        let mut results: Vec<TestResult> = self.store.list().await?;
        results.retain(|r| r.student == username);
        results.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(results)
    }

    /// Every attempt in the store, newest first. Staff-only at the route
    /// layer.
    pub async fn list_all(&self) -> Result<Vec<TestResult>, AppError> {
        let mut results: Vec<TestResult> = self.store.list().await?;
        results.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(results)
    }
}
