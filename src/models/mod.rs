// src/models/mod.rs

pub mod material;
pub mod result;
pub mod user;

/// Version stamped into every persisted document.
pub const SCHEMA_VERSION: u32 = 1;

pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}
