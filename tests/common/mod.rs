// tests/common/mod.rs

use std::sync::Arc;

use async_trait::async_trait;
use quizforge::config::Config;
use quizforge::routes;
use quizforge::services::ai::{ChatModel, ChatRequest, UpstreamError};
use quizforge::state::AppState;
use quizforge::store::{
    material_repo::MaterialRepository, result_repo::ResultRepository, test_repo::TestRepository,
    user_directory::UserDirectory,
};

/// Upstream stand-in: replies with a fixed string, or fails every call when
/// no reply is scripted.
pub struct StubModel {
    pub reply: Option<String>,
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, _req: ChatRequest) -> Result<String, UpstreamError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(UpstreamError("stubbed upstream failure".to_string())),
        }
    }
}

pub struct TestApp {
    pub address: String,
    // Hold the tempdir so the data directory outlives the test.
    _data_dir: tempfile::TempDir,
}

/// Spawns the app on a random port with a throwaway data directory, seeded
/// accounts and the given upstream stub. Returns the base URL wrapper.
pub async fn spawn_app(stub_reply: Option<String>) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp data dir");
    let data_dir_path = data_dir.path().to_str().unwrap().to_string();

    let config = Config {
        data_dir: data_dir_path.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        groq_api_key: "test-key".to_string(),
        groq_api_url: "http://127.0.0.1:9/unreachable".to_string(),
        groq_model: "test-model".to_string(),
        upstream_timeout_secs: 1,
        admin_username: None,
        admin_password: None,
    };

    let tests = TestRepository::open(&data_dir_path).await.unwrap();
    let results = ResultRepository::open(&data_dir_path).await.unwrap();
    let materials = MaterialRepository::open(&data_dir_path).await.unwrap();
    let users = UserDirectory::open(&data_dir_path).await.unwrap();

    users.upsert("student1", "pass123", "student").await.unwrap();
    users
        .upsert("student2", "student456", "student")
        .await
        .unwrap();
    users.upsert("staff1", "staffpass", "staff").await.unwrap();

    let state = AppState {
        config,
        tests,
        results,
        materials,
        users,
        ai: Arc::new(StubModel { reply: stub_reply }),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        _data_dir: data_dir,
    }
}

/// Logs in and returns the session token. Panics on failure.
pub async fn login(
    client: &reqwest::Client,
    address: &str,
    username: &str,
    password: &str,
    role: &str,
) -> String {
    let response = client
        .post(format!("{}/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password,
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to execute login request");

    assert_eq!(response.status().as_u16(), 200, "login failed");
    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Creates a one-question arithmetic test via the staff API, returns its id.
#[allow(dead_code)]
pub async fn create_math_test(client: &reqwest::Client, address: &str, staff_token: &str) -> String {
    let response = client
        .post(format!("{}/save_test", address))
        .bearer_auth(staff_token)
        .json(&serde_json::json!({
            "name": "Math",
            "timeLimit": 20,
            "questions": [
                {"question": "2+2?", "options": ["3", "4"], "correctIndex": 1}
            ],
        }))
        .send()
        .await
        .expect("Failed to execute save_test request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}
