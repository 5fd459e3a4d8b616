use crate::{config::Config, notify::Notifier, security::TokenKeys};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every request handler; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenKeys>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, notifier: Notifier) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_ttl_hours);

        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            notifier,
        }
    }
}
