// src/store/test_repo.rs

use chrono::Utc;

use super::JsonStore;
use crate::{
    error::AppError,
    models::{
        SCHEMA_VERSION,
        test::{Question, Test, UpdateTestRequest},
    },
};

/// Persists tests one document per test under `<data_dir>/tests`.
#[derive(Debug, Clone)]
pub struct TestRepository {
    store: JsonStore,
}

impl TestRepository {
    pub async fn open(data_dir: &str) -> Result<Self, AppError> {
        let store = JsonStore::open(std::path::Path::new(data_dir).join("tests")).await?;
        Ok(Self { store })
    }

    pub async fn create(
        &self,
        name: String,
        time_limit: u32,
        questions: Vec<Question>,
        difficulty: String,
        created_by: &str,
    ) -> Result<Test, AppError> {
        let test = Test {
            schema_version: SCHEMA_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            name,
            time_limit,
            questions,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            difficulty,
            updated_at: None,
            updated_by: None,
        };
        self.store.put(&test.id, &test).await?;
        Ok(test)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Test>, AppError> {
        self.store.get(id).await
    }

    /// All tests, newest first.
    pub async fn list(&self) -> Result<Vec<Test>, AppError> {
        let mut tests: Vec<Test> = self.store.list().await?;
        tests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tests)
    }

    /// Applies a partial update and stamps `updated_at`/`updated_by`.
    /// Returns the stored test, or `None` if the id does not resolve.
    pub async fn update(
        &self,
        req: UpdateTestRequest,
        updated_by: &str,
    ) -> Result<Option<Test>, AppError> {
        let Some(mut test) = self.store.get::<Test>(&req.id).await? else {
            return Ok(None);
        };

        if let Some(name) = req.name {
            test.name = name;
        }
        if let Some(time_limit) = req.time_limit {
            test.time_limit = time_limit;
        }
        if let Some(questions) = req.questions {
            test.questions = questions;
        }
        test.updated_at = Some(Utc::now());
        test.updated_by = Some(updated_by.to_string());

        self.store.put(&test.id, &test).await?;
        Ok(Some(test))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.store.delete(id).await
    }
}
