// src/store/user_directory.rs

use super::JsonStore;
use crate::{
    error::AppError,
    models::{SCHEMA_VERSION, user::UserRecord},
    utils::hash::{hash_password, verify_password},
};

/// Account directory: one document per user under `<data_dir>/users`,
/// passwords stored as argon2 hashes only.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    store: JsonStore,
}

impl UserDirectory {
    pub async fn open(data_dir: &str) -> Result<Self, AppError> {
        let store = JsonStore::open(std::path::Path::new(data_dir).join("users")).await?;
        Ok(Self { store })
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        self.store.get(username).await
    }

    /// Creates or replaces an account, hashing the given plaintext password.
    pub async fn upsert(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<(), AppError> {
        let record = UserRecord {
            schema_version: SCHEMA_VERSION,
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: role.to_string(),
        };
        self.store.put(username, &record).await
    }

    /// Verifies username, password and role together. Any mismatch yields
    /// `None`; the caller turns that into a single generic auth failure so
    /// nothing about which field was wrong leaks out.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        // A username the store rejects as a document id (path separators,
        // "..") is just an account that does not exist; it must not
        // surface as a distinct error class.
        let record = match self.lookup(username).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(AppError::BadRequest(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if record.role != role {
            return Ok(None);
        }
        if !verify_password(password, &record.password_hash)? {
            return Ok(None);
        }
        Ok(Some(record))
    }
}
