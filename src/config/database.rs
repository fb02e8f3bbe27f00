//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::{lookup_var, parse_var, ConfigError};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Construye la configuración a partir de una URL con los valores por defecto
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// Lee `DATABASE_URL` y los parámetros del pool. `Ok(None)` si no hay URL.
    pub fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(url) = lookup_var(lookup, "DATABASE_URL") else {
            return Ok(None);
        };

        let defaults = Self::with_url(url);
        let max_connections = parse_var(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?;
        let min_connections = parse_var(lookup, "DATABASE_MIN_CONNECTIONS", defaults.min_connections)?;
        let connect_timeout_secs = parse_var(
            lookup,
            "DATABASE_CONNECT_TIMEOUT_SECS",
            defaults.connect_timeout.as_secs(),
        )?;

        if min_connections > max_connections {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MIN_CONNECTIONS",
                value: min_connections.to_string(),
                reason: format!("must not exceed DATABASE_MAX_CONNECTIONS ({})", max_connections),
            });
        }

        Ok(Some(Self {
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            ..defaults
        }))
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        tracing::info!("🗄️ Conectando a {}", mask_database_url(&self.url));
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

/// Enmascara las credenciales de la URL para los logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    match url.rfind('@') {
        Some(at_pos) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
