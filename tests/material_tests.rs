// tests/material_tests.rs

mod common;

use common::{login, spawn_app};

fn pdf_part(filename: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(b"%PDF-1.4 not a real document".to_vec())
        .file_name(filename.to_string())
}

#[tokio::test]
async fn material_upload_and_listing_roundtrip() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();
    let staff_token = login(&client, &app.address, "staff1", "staffpass", "staff").await;
    let student_token = login(&client, &app.address, "student1", "pass123", "student").await;

    let form = reqwest::multipart::Form::new()
        .part("materialFile", pdf_part("chapter1.pdf"))
        .text("materialTitle", "Chapter 1")
        .text("materialType", "lecture-notes");

    let response = client
        .post(format!("{}/upload_material", app.address))
        .bearer_auth(&staff_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute upload_material request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["material"]["title"], "Chapter 1");
    assert_eq!(body["material"]["filename"], "chapter1.pdf");
    assert_eq!(body["material"]["uploadedBy"], "staff1");

    // Any authenticated account can browse the library.
    let body: serde_json::Value = client
        .get(format!("{}/materials", app.address))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let materials = body["materials"].as_array().unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0]["materialType"], "lecture-notes");
}

#[tokio::test]
async fn uploaded_material_can_be_downloaded() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();
    let staff_token = login(&client, &app.address, "staff1", "staffpass", "staff").await;
    let student_token = login(&client, &app.address, "student1", "pass123", "student").await;

    let form = reqwest::multipart::Form::new()
        .part("materialFile", pdf_part("chapter1.pdf"))
        .text("materialTitle", "Chapter 1")
        .text("materialType", "lecture-notes");

    let body: serde_json::Value = client
        .post(format!("{}/upload_material", app.address))
        .bearer_auth(&staff_token)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let material_id = body["material"]["id"].as_str().unwrap();

    // Any authenticated account can fetch the stored bytes back.
    let response = client
        .get(format!("{}/material/download/{}", app.address, material_id))
        .bearer_auth(&student_token)
        .send()
        .await
        .expect("Failed to execute download request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    assert!(
        response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("chapter1.pdf")
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 not a real document");

    // Unknown ids are a 404, and the route still requires a session.
    let response = client
        .get(format!("{}/material/download/no-such-id", app.address))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/material/download/{}", app.address, material_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn material_upload_rejects_non_pdf() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();
    let staff_token = login(&client, &app.address, "staff1", "staffpass", "staff").await;

    let form = reqwest::multipart::Form::new()
        .part("materialFile", pdf_part("notes.docx"))
        .text("materialTitle", "Notes")
        .text("materialType", "doc");

    let response = client
        .post(format!("{}/upload_material", app.address))
        .bearer_auth(&staff_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn material_upload_is_staff_only() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();
    let student_token = login(&client, &app.address, "student1", "pass123", "student").await;

    let form = reqwest::multipart::Form::new()
        .part("materialFile", pdf_part("chapter1.pdf"))
        .text("materialTitle", "Chapter 1")
        .text("materialType", "lecture-notes");

    let response = client
        .post(format!("{}/upload_material", app.address))
        .bearer_auth(&student_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn question_generation_upload_rejects_malformed_pdf() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();
    let staff_token = login(&client, &app.address, "staff1", "staffpass", "staff").await;

    let form = reqwest::multipart::Form::new()
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"this is not a pdf at all".to_vec())
                .file_name("broken.pdf"),
        )
        .text("num_questions", "5")
        .text("complexity", "Easy");

    let response = client
        .post(format!("{}/upload", app.address))
        .bearer_auth(&staff_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}
