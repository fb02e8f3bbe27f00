use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Filtro opcional por número de stock y paginación
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// Página de costes. `total` y `entries` cubren todas las filas del filtro,
/// no solo las de la página.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostListResponse<T> {
    pub items: Vec<T>,
    pub total: Decimal,
    pub entries: i64,
    pub limit: i64,
    pub offset: i64,
}
