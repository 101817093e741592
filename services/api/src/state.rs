//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::{
    accounts::AccountService, assistant::AssistantGateway, orchestrator::Orchestrator,
    repositories::{HistoryRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub accounts: AccountService,
    pub history_repository: HistoryRepository,
    pub orchestrator: Orchestrator,
}

impl AppState {
    /// Wire the repositories and services around a pool and a gateway
    pub fn new(db_pool: SqlitePool, gateway: AssistantGateway) -> Self {
        let user_repository = UserRepository::new(db_pool.clone());
        let history_repository = HistoryRepository::new(db_pool.clone());

        Self {
            accounts: AccountService::new(user_repository),
            orchestrator: Orchestrator::new(gateway, history_repository.clone()),
            history_repository,
            db_pool,
        }
    }
}
