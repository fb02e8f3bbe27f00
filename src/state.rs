//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Store;
use crate::services::identity_service::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<IdentityVerifier>,
    pub config: Arc<EnvironmentConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, identity: IdentityVerifier, config: EnvironmentConfig) -> Self {
        Self {
            store,
            identity: Arc::new(identity),
            config: Arc::new(config),
        }
    }
}
