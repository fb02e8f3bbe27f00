//! Modelo de TestDriveEntry
//!
//! Este módulo contiene las reservas de prueba de conducción. Los datos del
//! cliente se guardan como copia en el momento de la reserva.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::DealerId;

super::text_enum! {
    /// Estado de la prueba de conducción
    TestDriveStatus, "test drive status", {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
        NoShow => "no_show",
    }
}

impl Default for TestDriveStatus {
    fn default() -> Self {
        TestDriveStatus::Scheduled
    }
}

/// Duración por defecto en minutos
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

/// TestDriveEntry principal - mapea a la tabla test_drive_entries
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TestDriveEntry {
    pub id: Uuid,
    pub dealer_id: DealerId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_registration: Option<String>,
    pub vehicle_stock_number: Option<String>,
    pub drive_date: NaiveDate,
    pub drive_time: NaiveTime,
    pub duration_minutes: i32,
    #[sqlx(try_from = "String")]
    pub status: TestDriveStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestDriveEntry {
    pub fn vehicle_label(&self) -> String {
        format!("{} {}", self.vehicle_make, self.vehicle_model)
    }

    /// Coincidencia sin distinguir mayúsculas sobre cliente y vehículo
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let fields = [
            self.customer_name.as_str(),
            self.customer_email.as_str(),
            self.vehicle_make.as_str(),
            self.vehicle_model.as_str(),
        ];
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Campos validados de una prueba de conducción
#[derive(Debug, Clone)]
pub struct TestDriveFields {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_registration: Option<String>,
    pub vehicle_stock_number: Option<String>,
    pub drive_date: NaiveDate,
    pub drive_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: TestDriveStatus,
    pub notes: Option<String>,
}

/// Filtros del listado de pruebas (orden fijo: fecha y hora ascendentes)
#[derive(Debug, Clone)]
pub struct TestDriveQuery {
    pub date: Option<NaiveDate>,
    pub status: Option<TestDriveStatus>,
    pub search: Option<String>,
    pub limit: i64,
}

impl Default for TestDriveQuery {
    fn default() -> Self {
        Self {
            date: None,
            status: None,
            search: None,
            limit: 200,
        }
    }
}
