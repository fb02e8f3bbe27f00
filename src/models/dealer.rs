//! Modelo de Dealer
//!
//! Este módulo contiene el concesionario (tenant) y su identificador.
//! `DealerId` solo lo produce el almacenamiento al cargar una fila de
//! `dealers`; las peticiones HTTP no pueden construirlo.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Identificador de concesionario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct DealerId(Uuid);

impl DealerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DealerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Dealer principal - mapea a la tabla dealers
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Dealer {
    pub id: DealerId,
    pub external_user_id: String,
    pub business_name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos editables del perfil del concesionario, ya validados
#[derive(Debug, Clone)]
pub struct DealerProfile {
    pub business_name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Alta de un concesionario para un usuario del proveedor de identidad
#[derive(Debug, Clone)]
pub struct NewDealer {
    pub external_user_id: String,
    pub profile: DealerProfile,
}
