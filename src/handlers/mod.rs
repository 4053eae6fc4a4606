// src/handlers/mod.rs

pub mod auth;
pub mod materials;
pub mod staff;
pub mod student;
