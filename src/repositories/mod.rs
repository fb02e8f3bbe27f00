//! Repositorios de datos
//!
//! Este módulo define los traits de acceso a datos. Todo método sobre una
//! tabla de un concesionario recibe el `DealerId` y filtra por él. `Store`
//! agrupa los repositorios y tiene dos implementaciones: PostgreSQL y memoria.

pub mod cost_repository;
pub mod customer_repository;
pub mod dealer_repository;
pub mod memory_store;
pub mod postgres;
pub mod scope;
pub mod test_drive_repository;

pub use cost_repository::CostRepository;
pub use customer_repository::CustomerRepository;
pub use dealer_repository::DealerRepository;
pub use memory_store::MemoryStore;
pub use postgres::PgStore;
pub use scope::DealerScope;
pub use test_drive_repository::TestDriveRepository;

use async_trait::async_trait;

use crate::utils::errors::{AppError, AppResult};

/// Almacenamiento completo de la aplicación
#[async_trait]
pub trait Store: DealerRepository + CustomerRepository + TestDriveRepository + CostRepository {
    /// Nombre del backend para logs y health check
    fn backend_name(&self) -> &'static str;

    /// Comprueba que el almacenamiento responde
    async fn ping(&self) -> AppResult<()>;

    /// Libera las conexiones al apagar
    async fn close(&self) {}
}

/// Código SQLSTATE de violación de unicidad
const UNIQUE_VIOLATION: &str = "23505";

/// Convierte una violación de unicidad en `Conflict`; el resto pasa como error de base de datos
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == UNIQUE_VIOLATION)
        .unwrap_or(false);

    if is_unique {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(err)
    }
}
