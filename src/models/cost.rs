//! Modelos de costes
//!
//! Este módulo contiene los costes imputados a vehículos en stock y los
//! costes de devoluciones. Ambos son de solo lectura a través de la API.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::DealerId;

super::text_enum! {
    /// Categoría del coste de vehículo
    VehicleCostCategory, "vehicle cost category", {
        Purchase => "purchase",
        Preparation => "preparation",
        Repair => "repair",
        Transport => "transport",
        Other => "other",
    }
}

/// VehicleCost - mapea a la tabla vehicle_costs
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleCost {
    pub id: Uuid,
    pub dealer_id: DealerId,
    pub stock_number: String,
    pub vehicle_description: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: VehicleCostCategory,
    pub description: Option<String>,
    pub amount: Decimal,
    pub incurred_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// ReturnCost - mapea a la tabla return_costs
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReturnCost {
    pub id: Uuid,
    pub dealer_id: DealerId,
    pub stock_number: String,
    pub vehicle_description: Option<String>,
    pub reason: Option<String>,
    pub amount: Decimal,
    pub returned_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Tamaño de página por defecto y máximo de los listados de costes
pub const DEFAULT_COST_LIMIT: i64 = 200;
pub const MAX_COST_LIMIT: i64 = 500;

/// Filtro de los listados de costes (orden fijo: `created_at` descendente).
/// `limit`/`offset` solo paginan las filas; los totales cubren todo el filtro.
#[derive(Debug, Clone)]
pub struct CostQuery {
    pub stock_number: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for CostQuery {
    fn default() -> Self {
        Self {
            stock_number: None,
            limit: DEFAULT_COST_LIMIT,
            offset: 0,
        }
    }
}

/// Agregado de un listado de costes sobre todas las filas del filtro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow)]
pub struct CostSummary {
    pub entries: i64,
    pub total: Decimal,
}

impl CostSummary {
    /// Total normalizado a céntimos
    pub fn in_cents(self) -> Self {
        Self {
            total: to_cents(self.total),
            ..self
        }
    }
}

/// Alta de un coste de vehículo (carga de datos)
#[derive(Debug, Clone)]
pub struct NewVehicleCost {
    pub stock_number: String,
    pub vehicle_description: Option<String>,
    pub category: VehicleCostCategory,
    pub description: Option<String>,
    pub amount: Decimal,
    pub incurred_on: Option<NaiveDate>,
}

/// Alta de un coste de devolución (carga de datos)
#[derive(Debug, Clone)]
pub struct NewReturnCost {
    pub stock_number: String,
    pub vehicle_description: Option<String>,
    pub reason: Option<String>,
    pub amount: Decimal,
    pub returned_on: Option<NaiveDate>,
}

/// Importe redondeado y con escala fija de dos decimales (`0` -> `0.00`)
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut cents = amount.round_dp(2);
    cents.rescale(2);
    cents
}

/// Suma de importes, redondeada a céntimos
pub fn total_amount<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    to_cents(amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount))
}
