// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answer as submitted by the student. Transient input to scoring,
/// never persisted on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question: String,
    pub selected: String,
    pub correct: String,
}

/// A graded answer with its feedback text. Persisted only inside a Result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedAnswer {
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
    pub feedback: String,
}

/// An immutable record of one student's graded attempt at one test.
///
/// `test_id` referenced a live test at submission time; the test may have
/// been deleted since, and the dangling reference is tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default = "crate::models::schema_version")]
    pub schema_version: u32,
    pub id: String,
    pub test_id: String,
    /// Snapshot of the test name at submission time.
    pub test_name: String,
    pub student: String,
    pub date: DateTime<Utc>,
    pub score_percent: u32,
    pub correct_count: usize,
    pub total_questions: usize,
    /// Seconds the student spent, as reported by the client.
    pub time_taken: u64,
    pub answers: Vec<EvaluatedAnswer>,
}

/// Small summary returned from submission; the full per-answer feedback is
/// fetched separately via `/get_result/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCreated {
    pub id: String,
    pub score_percent: u32,
    pub correct_count: usize,
    pub total_questions: usize,
    pub time_taken: u64,
}

/// Listing entry for a student's own history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub test_id: String,
    pub test_name: String,
    pub date: DateTime<Utc>,
    pub score_percent: u32,
    pub time_taken: u64,
}

/// Listing entry for the staff results overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffResultSummary {
    pub id: String,
    pub student: String,
    pub test_name: String,
    pub date: DateTime<Utc>,
    pub score_percent: u32,
    pub correct_count: usize,
    pub total_questions: usize,
}

fn default_time_taken() -> u64 {
    0
}

/// DTO for submitting a completed attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestRequest {
    pub test_id: String,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    #[serde(default = "default_time_taken")]
    pub time_taken: u64,
}
