// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use quizforge::config::Config;
use quizforge::routes;
use quizforge::services::ai::GroqClient;
use quizforge::state::AppState;
use quizforge::store::{
    material_repo::MaterialRepository, result_repo::ResultRepository, test_repo::TestRepository,
    user_directory::UserDirectory,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the document stores (creates the data directories on first run)
    let tests = TestRepository::open(&config.data_dir)
        .await
        .expect("Failed to open test store");
    let results = ResultRepository::open(&config.data_dir)
        .await
        .expect("Failed to open result store");
    let materials = MaterialRepository::open(&config.data_dir)
        .await
        .expect("Failed to open material store");
    let users = UserDirectory::open(&config.data_dir)
        .await
        .expect("Failed to open user directory");

    tracing::info!("Document stores ready under {}", config.data_dir);

    // Seed Staff User
    if let Err(e) = seed_admin_user(&users, &config).await {
        tracing::error!("Failed to seed staff user: {:?}", e);
    }

    let ai = GroqClient::new(&config).expect("Failed to build upstream client");

    // Create AppState
    let state = AppState {
        config: config.clone(),
        tests,
        results,
        materials,
        users,
        ai: Arc::new(ai),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

async fn seed_admin_user(
    users: &UserDirectory,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        if users.lookup(username).await?.is_none() {
            tracing::info!("Seeding staff user: {}", username);
            users.upsert(username, password, "staff").await?;
            tracing::info!("Staff user created successfully.");
        }
    }
    Ok(())
}
