// src/state.rs

use axum::extract::FromRef;

use crate::config::Config;
use crate::services::ai::DynChatModel;
use crate::store::{
    material_repo::MaterialRepository, result_repo::ResultRepository, test_repo::TestRepository,
    user_directory::UserDirectory,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tests: TestRepository,
    pub results: ResultRepository,
    pub materials: MaterialRepository,
    pub users: UserDirectory,
    pub ai: DynChatModel,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for TestRepository {
    fn from_ref(state: &AppState) -> Self {
        state.tests.clone()
    }
}

impl FromRef<AppState> for ResultRepository {
    fn from_ref(state: &AppState) -> Self {
        state.results.clone()
    }
}

impl FromRef<AppState> for MaterialRepository {
    fn from_ref(state: &AppState) -> Self {
        state.materials.clone()
    }
}

impl FromRef<AppState> for UserDirectory {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for DynChatModel {
    fn from_ref(state: &AppState) -> Self {
        state.ai.clone()
    }
}
