// src/services/mod.rs

pub mod ai;
pub mod generator;
pub mod grading;
