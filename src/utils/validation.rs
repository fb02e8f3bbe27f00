//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos usadas por los DTOs y controladores.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Teléfono: dígitos, espacios, `-` y paréntesis, con `+` inicial opcional.
    /// La longitud total, `+` incluido, va de 7 a 20 caracteres.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^(?:\+[0-9 ()\-]{6,19}|[0-9 ()\-]{7,20})$").unwrap();

    /// Matrícula: letras, dígitos y espacios (2 a 12 caracteres)
    pub static ref REGISTRATION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9 ]{2,12}$").unwrap();
}

/// Máximo de etiquetas por cliente
pub const MAX_TAGS: usize = 50;

/// Longitud máxima de una etiqueta
pub const MAX_TAG_LENGTH: usize = 50;

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a hora. Acepta `HH:MM` y `HH:MM:SS`.
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            let mut error = ValidationError::new("time");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"HH:MM[:SS]".to_string());
            error
        })
}

/// Deserializador serde para horas con o sin segundos
pub fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate_time(&raw).map_err(|_| {
        serde::de::Error::custom(format!("invalid time '{}', expected HH:MM or HH:MM:SS", raw))
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Recorta un campo opcional; vacío pasa a `None`
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Construye un `ValidationErrors` con un único campo fallido
pub fn field_error(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Normaliza un término de búsqueda: `None` si está vacío
pub fn normalize_search_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// Patrón ILIKE `%term%` con `\`, `%` y `_` escapados
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Limpia la lista de etiquetas: recorta, descarta vacías y duplicadas
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if tag.is_empty() || cleaned.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            let mut error = ValidationError::new("tag_length");
            error.add_param("max".into(), &MAX_TAG_LENGTH);
            return Err(error);
        }
        cleaned.push(tag);
    }

    if cleaned.len() > MAX_TAGS {
        let mut error = ValidationError::new("too_many_tags");
        error.add_param("max".into(), &MAX_TAGS);
        return Err(error);
    }

    Ok(cleaned)
}
