//! Controladores
//!
//! Este módulo contiene la lógica de cada recurso: normalización de
//! parámetros, validación y mapeo entre DTOs y modelos. Los controladores
//! solo acceden a datos a través de `DealerScope`.

pub mod cost_controller;
pub mod customer_controller;
pub mod dealer_controller;
pub mod document_controller;
pub mod test_drive_controller;

use std::str::FromStr;

use crate::utils::errors::AppError;

/// Parsea un parámetro de consulta opcional; vacío equivale a ausente
pub(crate) fn parse_param<T>(name: &str, value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {} '{}'", name, raw))),
    }
}

/// Límite de página: `default` si falta, recortado a `max`, error si es menor que 1
pub(crate) fn page_limit(limit: Option<i64>, default: i64, max: i64) -> Result<i64, AppError> {
    match limit {
        None => Ok(default),
        Some(l) if l < 1 => Err(AppError::BadRequest("limit must be at least 1".to_string())),
        Some(l) => Ok(l.min(max)),
    }
}
