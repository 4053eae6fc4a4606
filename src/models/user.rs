// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored account: one document per user in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default = "crate::models::schema_version")]
    pub schema_version: u32,

    /// Unique username, doubles as the document id.
    pub username: String,

    /// Argon2 password hash. This record is persisted through serde, so the
    /// hash must serialize; handlers never put a `UserRecord` in a response.
    pub password_hash: String,

    /// Account role: 'student' or 'staff'.
    pub role: String,
}

/// DTO for login. Role is part of the credential check: a student token can
/// never be obtained with staff credentials and vice versa.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 20))]
    pub role: String,
}
