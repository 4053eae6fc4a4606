// src/handlers/staff.rs

use axum::{
    Json,
    extract::{Extension, Multipart, Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        result::StaffResultSummary,
        test::{SaveTestRequest, StaffTestSummary, UpdateTestRequest},
    },
    services::{ai::DynChatModel, generator},
    store::{result_repo::ResultRepository, test_repo::TestRepository},
    utils::{jwt::Claims, pdf},
};

/// Uploads a PDF and generates candidate questions from its text.
///
/// Multipart form: `file` plus the generation knobs `num_questions`,
/// `complexity`, `num_sets` (options per question) and `num_question_sets`.
/// The generated questions are returned for curation, not persisted; staff
/// save a subset of them via `/save_test`.
pub async fn upload(
    State(model): State<DynChatModel>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut num_questions: u32 = 5;
    let mut complexity = "Easy".to_string();
    let mut num_sets: u32 = 4;
    let mut num_question_sets: u32 = 3;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                pdf_bytes = Some(bytes.to_vec());
            }
            "num_questions" => {
                let text = field.text().await.unwrap_or_default();
                num_questions = text.parse().unwrap_or(5);
            }
            "complexity" => {
                complexity = field.text().await.unwrap_or_else(|_| "Easy".to_string());
            }
            "num_sets" => {
                let text = field.text().await.unwrap_or_default();
                num_sets = text.parse().unwrap_or(4);
            }
            "num_question_sets" => {
                let text = field.text().await.unwrap_or_default();
                num_question_sets = text.parse().unwrap_or(3);
            }
            _ => {}
        }
    }

    let pdf_bytes = pdf_bytes.ok_or(AppError::BadRequest("No file uploaded".to_string()))?;
    if pdf_bytes.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }

    let extracted_text = pdf::extract_text(pdf_bytes).await?;
    let mcqs = generator::generate_mcqs(
        model.as_ref(),
        &extracted_text,
        num_questions,
        &complexity,
        num_sets,
    )
    .await;
    let question_sets = generator::build_question_sets(&mcqs, num_question_sets);

    Ok(Json(json!({
        "success": true,
        "mcqs": mcqs,
        "questionSets": question_sets,
    })))
}

/// Saves a curated set of questions as a named test.
pub async fn save_test(
    State(tests): State<TestRepository>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let test = tests
        .create(
            payload.name,
            payload.time_limit,
            payload.questions,
            payload.difficulty,
            &claims.sub,
        )
        .await?;

    tracing::info!("Test '{}' created by {}", test.name, claims.sub);

    Ok(Json(json!({ "success": true, "id": test.id })))
}

/// Partially updates a test's name, time limit or questions.
pub async fn update_test(
    State(tests): State<TestRepository>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let test = tests
        .update(payload, &claims.sub)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(json!({ "success": true, "id": test.id })))
}

/// Deletes a test by id.
///
/// Results referencing the test stay retrievable; the dangling reference is
/// tolerated.
pub async fn delete_test(
    State(tests): State<TestRepository>,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !tests.delete(&test_id).await? {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// Lists all tests with their creation metadata, newest first.
pub async fn staff_tests(
    State(tests): State<TestRepository>,
) -> Result<impl IntoResponse, AppError> {
    let listing: Vec<StaffTestSummary> = tests
        .list()
        .await?
        .into_iter()
        .map(|t| StaffTestSummary {
            id: t.id,
            name: t.name,
            question_count: t.questions.len(),
            time_limit: t.time_limit,
            created_at: t.created_at,
            created_by: t.created_by,
            difficulty: t.difficulty,
        })
        .collect();

    Ok(Json(json!({ "success": true, "tests": listing })))
}

/// Lists every student attempt across all tests, newest first.
pub async fn student_results(
    State(results): State<ResultRepository>,
) -> Result<impl IntoResponse, AppError> {
    let listing: Vec<StaffResultSummary> = results
        .list_all()
        .await?
        .into_iter()
        .map(|r| StaffResultSummary {
            id: r.id,
            student: r.student,
            test_name: r.test_name,
            date: r.date,
            score_percent: r.score_percent,
            correct_count: r.correct_count,
            total_questions: r.total_questions,
        })
        .collect();

    Ok(Json(json!({ "success": true, "results": listing })))
}
