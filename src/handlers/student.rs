// src/handlers/student.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        SCHEMA_VERSION,
        result::{HistoryEntry, ResultCreated, SubmitTestRequest, TestResult},
        test::AvailableTest,
    },
    services::{ai::DynChatModel, grading},
    store::{result_repo::ResultRepository, test_repo::TestRepository},
    utils::jwt::Claims,
};

/// Lists every test a student can take, newest first.
pub async fn available_tests(
    State(tests): State<TestRepository>,
) -> Result<impl IntoResponse, AppError> {
    let listing: Vec<AvailableTest> = tests
        .list()
        .await?
        .into_iter()
        .map(|t| AvailableTest {
            id: t.id,
            name: t.name,
            question_count: t.questions.len(),
            time_limit: t.time_limit,
            creator: t.created_by,
            difficulty: t.difficulty,
        })
        .collect();

    Ok(Json(json!({ "success": true, "tests": listing })))
}

/// Fetches one test with its full question list.
pub async fn get_test(
    State(tests): State<TestRepository>,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let test = tests
        .get(&test_id)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(json!({ "success": true, "test": test })))
}

/// Grades a submitted attempt and persists the result.
///
/// Feedback for wrong answers comes from the upstream model one call at a
/// time; an upstream failure downgrades that answer's feedback to the fixed
/// fallback and never fails the submission. The response carries only the
/// small score summary; per-answer feedback is fetched via `/get_result`.
pub async fn submit_test(
    State(tests): State<TestRepository>,
    State(results): State<ResultRepository>,
    State(model): State<DynChatModel>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.answers.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let test = tests
        .get(&req.test_id)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    let (evaluated, correct_count) = grading::evaluate_answers(model.as_ref(), &req.answers).await;
    let total_questions = evaluated.len();
    let score_percent = grading::score_percent(correct_count, total_questions);

    let result = TestResult {
        schema_version: SCHEMA_VERSION,
        id: uuid::Uuid::new_v4().to_string(),
        test_id: test.id,
        test_name: test.name,
        student: claims.sub,
        date: Utc::now(),
        score_percent,
        correct_count,
        total_questions,
        time_taken: req.time_taken,
        answers: evaluated,
    };
    results.create(&result).await?;

    let summary = ResultCreated {
        id: result.id,
        score_percent,
        correct_count,
        total_questions,
        time_taken: result.time_taken,
    };

    Ok(Json(json!({ "success": true, "results": summary })))
}

/// A student's own graded attempts, newest first.
pub async fn test_history(
    State(results): State<ResultRepository>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let history: Vec<HistoryEntry> = results
        .list_by_student(&claims.sub)
        .await?
        .into_iter()
        .map(|r| HistoryEntry {
            id: r.id,
            test_id: r.test_id,
            test_name: r.test_name,
            date: r.date,
            score_percent: r.score_percent,
            time_taken: r.time_taken,
        })
        .collect();

    Ok(Json(json!({ "success": true, "history": history })))
}

/// Fetches one full result, including per-answer feedback.
///
/// A student may only read their own results; staff may read any.
pub async fn get_result(
    State(results): State<ResultRepository>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = results
        .get(&result_id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if claims.role == "student" && result.student != claims.sub {
        return Err(AppError::Forbidden);
    }

    Ok(Json(json!({ "success": true, "result": result })))
}
