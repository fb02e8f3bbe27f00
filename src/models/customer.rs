//! Modelo de Customer
//!
//! Este módulo contiene el cliente del concesionario, sus campos editables,
//! la regla de consentimiento y los parámetros de búsqueda/ordenación.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use super::{DealerId, ModelError, SortOrder};

super::text_enum! {
    /// Estado comercial del cliente
    CustomerStatus, "customer status", {
        Lead => "lead",
        Prospect => "prospect",
        Customer => "customer",
        Inactive => "inactive",
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::Lead
    }
}

/// Customer principal - mapea a la tabla customers
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub dealer_id: DealerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CustomerStatus,
    pub marketing_consent: bool,
    pub sales_consent: bool,
    pub gdpr_consent: bool,
    pub consent_date: Option<DateTime<Utc>>,
    pub tags: Json<Vec<String>>,
    pub custom_fields: Json<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Coincidencia sin distinguir mayúsculas sobre nombre, apellidos,
    /// nombre completo, email y teléfono. `term` ya viene recortado.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let full_name = self.full_name();
        let fields = [
            self.first_name.as_str(),
            self.last_name.as_str(),
            full_name.as_str(),
            self.email.as_str(),
            self.phone.as_deref().unwrap_or(""),
        ];
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Campos validados de un cliente, usados tanto al crear como al actualizar
#[derive(Debug, Clone)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub status: CustomerStatus,
    pub marketing_consent: bool,
    pub sales_consent: bool,
    pub gdpr_consent: bool,
    pub consent_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub custom_fields: serde_json::Value,
    pub notes: Option<String>,
}

impl CustomerFields {
    pub fn has_any_consent(&self) -> bool {
        self.marketing_consent || self.sales_consent || self.gdpr_consent
    }

    /// Con algún consentimiento y sin fecha se sella `now`; sin ninguno se borra la fecha.
    pub fn apply_consent_rule(&mut self, now: DateTime<Utc>) {
        if !self.has_any_consent() {
            self.consent_date = None;
        } else if self.consent_date.is_none() {
            self.consent_date = Some(now);
        }
    }
}

/// Columnas por las que se puede ordenar el listado de clientes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSort {
    #[default]
    CreatedAt,
    LastName,
    FirstName,
    Email,
    Status,
}

impl std::str::FromStr for CustomerSort {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(CustomerSort::CreatedAt),
            "last_name" => Ok(CustomerSort::LastName),
            "first_name" => Ok(CustomerSort::FirstName),
            "email" => Ok(CustomerSort::Email),
            "status" => Ok(CustomerSort::Status),
            other => Err(ModelError::UnknownVariant {
                kind: "sort column",
                value: other.to_string(),
            }),
        }
    }
}

impl CustomerSort {
    /// Expresión SQL de la columna. Las de texto se comparan en minúsculas.
    pub fn sql_expression(&self) -> &'static str {
        match self {
            CustomerSort::CreatedAt => "created_at",
            CustomerSort::LastName => "lower(last_name)",
            CustomerSort::FirstName => "lower(first_name)",
            CustomerSort::Email => "lower(email)",
            CustomerSort::Status => "status",
        }
    }

    pub fn default_order(&self) -> SortOrder {
        match self {
            CustomerSort::CreatedAt => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// Misma ordenación que `sql_expression`, para el almacenamiento en memoria
    pub fn compare(&self, a: &Customer, b: &Customer) -> Ordering {
        match self {
            CustomerSort::CreatedAt => a.created_at.cmp(&b.created_at),
            CustomerSort::LastName => a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()),
            CustomerSort::FirstName => a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()),
            CustomerSort::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            CustomerSort::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

/// Parámetros ya normalizados del listado de clientes
#[derive(Debug, Clone)]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub status: Option<CustomerStatus>,
    pub sort: CustomerSort,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sort: CustomerSort::CreatedAt,
            order: SortOrder::Desc,
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fields() -> CustomerFields {
        CustomerFields {
            first_name: "Ann".into(),
            last_name: "Smith".into(),
            email: "ann@example.com".into(),
            phone: None,
            address_line: None,
            city: None,
            postcode: None,
            status: CustomerStatus::Lead,
            marketing_consent: false,
            sales_consent: false,
            gdpr_consent: false,
            consent_date: None,
            tags: vec![],
            custom_fields: serde_json::json!({}),
            notes: None,
        }
    }

    #[test]
    fn consent_date_is_stamped_when_missing() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let mut f = fields();
        f.gdpr_consent = true;
        f.apply_consent_rule(now);
        assert_eq!(f.consent_date, Some(now));
    }

    #[test]
    fn explicit_consent_date_is_kept() {
        let given = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut f = fields();
        f.sales_consent = true;
        f.consent_date = Some(given);
        f.apply_consent_rule(Utc::now());
        assert_eq!(f.consent_date, Some(given));
    }

    #[test]
    fn consent_date_is_cleared_without_consent() {
        let mut f = fields();
        f.consent_date = Some(Utc::now());
        f.apply_consent_rule(Utc::now());
        assert_eq!(f.consent_date, None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in CustomerStatus::ALL {
            assert_eq!(status.as_str().parse::<CustomerStatus>().unwrap(), *status);
        }
        assert!("vip".parse::<CustomerStatus>().is_err());
    }

    #[test]
    fn created_at_sorts_newest_first_by_default() {
        assert_eq!(CustomerSort::CreatedAt.default_order(), SortOrder::Desc);
        assert_eq!(CustomerSort::LastName.default_order(), SortOrder::Asc);
    }
}
