//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, backend de
//! almacenamiento, CORS y verificación de tokens del proveedor de identidad.

use std::env;
use std::str::FromStr;

use super::{lookup_var, parse_var, ConfigError, DatabaseConfig};

/// Backend de almacenamiento de la API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Clave con la que se verifican los tokens del proveedor de identidad
#[derive(Debug, Clone)]
pub enum IdentityKey {
    /// HS256 con secreto compartido
    SharedSecret(String),
    /// RS256 con clave pública PEM
    RsaPublicKeyPem(String),
}

/// Configuración del proveedor de identidad
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub key: IdentityKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub cors_origins: Vec<String>,
    pub identity: IdentityConfig,
}

impl EnvironmentConfig {
    /// Lee la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Lee la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            lookup_var(&lookup, "ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let host = lookup_var(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&lookup, "PORT", 3000u16)?;
        let storage_backend = parse_var(&lookup, "STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database = DatabaseConfig::from_lookup(&lookup)?;

        if storage_backend == StorageBackend::Postgres && database.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let cors_origins = lookup_var(&lookup, "CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let key = match (
            lookup_var(&lookup, "IDENTITY_JWT_PUBLIC_KEY"),
            lookup_var(&lookup, "IDENTITY_JWT_SECRET"),
        ) {
            (Some(pem), _) => IdentityKey::RsaPublicKeyPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => IdentityKey::SharedSecret(secret),
            (None, None) => return Err(ConfigError::Missing("IDENTITY_JWT_SECRET or IDENTITY_JWT_PUBLIC_KEY")),
        };

        let identity = IdentityConfig {
            key,
            issuer: lookup_var(&lookup, "IDENTITY_ISSUER"),
            audience: lookup_var(&lookup, "IDENTITY_AUDIENCE"),
        };

        Ok(Self {
            environment,
            host,
            port,
            storage_backend,
            database,
            cors_origins,
            identity,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
