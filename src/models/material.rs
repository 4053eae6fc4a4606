// src/models/material.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded reference PDF. One document per material; the
/// file bytes live next to the store under the materials directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default = "crate::models::schema_version")]
    pub schema_version: u32,
    pub id: String,
    pub title: String,
    pub material_type: String,
    pub filename: String,
    pub uploaded_by: String,
    pub upload_date: DateTime<Utc>,
}
