// src/handlers/materials.rs

use axum::{
    Json,
    extract::{Extension, Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    models::{SCHEMA_VERSION, material::Material},
    store::material_repo::MaterialRepository,
    utils::jwt::Claims,
};

fn is_pdf_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Strips any path components a browser might send along with the name.
fn sanitize_filename(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("upload.pdf")
        .to_string()
}

/// Uploads a reference PDF into the material library.
///
/// Multipart form: `materialFile` plus `materialTitle` and `materialType`.
/// Only `.pdf` files are accepted.
pub async fn upload_material(
    State(materials): State<MaterialRepository>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut title = String::new();
    let mut material_type = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "materialFile" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            "materialTitle" => title = field.text().await.unwrap_or_default(),
            "materialType" => material_type = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or(AppError::BadRequest("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    if !is_pdf_filename(&filename) {
        return Err(AppError::BadRequest("File type not allowed".to_string()));
    }

    let material = Material {
        schema_version: SCHEMA_VERSION,
        id: uuid::Uuid::new_v4().to_string(),
        title,
        material_type,
        filename: sanitize_filename(&filename),
        uploaded_by: claims.sub,
        upload_date: Utc::now(),
    };
    materials.create(&material, &bytes).await?;

    Ok(Json(json!({ "success": true, "material": material })))
}

/// Serves the stored PDF for a material as an attachment.
pub async fn download_material(
    State(materials): State<MaterialRepository>,
    Path(material_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let material = materials
        .get(&material_id)
        .await?
        .ok_or(AppError::NotFound("Material not found".to_string()))?;

    let bytes = materials
        .read_file(&material)
        .await?
        .ok_or(AppError::NotFound("Material not found".to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", material.filename),
        ),
    ];

    Ok((headers, bytes))
}

/// Lists uploaded material metadata, newest first.
pub async fn list_materials(
    State(materials): State<MaterialRepository>,
) -> Result<impl IntoResponse, AppError> {
    let listing = materials.list().await?;
    Ok(Json(json!({ "success": true, "materials": listing })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_filename_check() {
        assert!(is_pdf_filename("notes.pdf"));
        assert!(is_pdf_filename("NOTES.PDF"));
        assert!(!is_pdf_filename("notes.docx"));
        assert!(!is_pdf_filename("pdf"));
    }

    #[test]
    fn filename_is_stripped_of_paths() {
        assert_eq!(sanitize_filename("../../etc/notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\x\\notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_filename("notes.pdf"), "notes.pdf");
    }
}
