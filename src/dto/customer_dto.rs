use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::customer::{CustomerFields, CustomerStatus};
use crate::utils::errors::AppError;
use crate::utils::validation::{field_error, normalize_tags, trim_optional};

// Parámetros de consulta del listado de clientes (se validan en el controlador)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

// Request para crear o reemplazar un cliente
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_blank")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_blank")]
    pub last_name: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(regex = "crate::utils::validation::PHONE_REGEX")]
    pub phone: Option<String>,

    #[validate(length(max = 200))]
    pub address_line: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 20))]
    pub postcode: Option<String>,

    #[serde(default)]
    pub status: Option<CustomerStatus>,

    #[serde(default)]
    pub marketing_consent: bool,

    #[serde(default)]
    pub sales_consent: bool,

    #[serde(default)]
    pub gdpr_consent: bool,

    #[serde(default)]
    pub consent_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub custom_fields: Option<serde_json::Value>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl CustomerRequest {
    /// Recorta campos de texto antes de validar
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: trim_optional(self.phone),
            address_line: trim_optional(self.address_line),
            city: trim_optional(self.city),
            postcode: trim_optional(self.postcode),
            notes: trim_optional(self.notes),
            ..self
        }
    }

    /// Convierte la request validada en campos de cliente con la regla de consentimiento aplicada
    pub fn into_fields(self, now: DateTime<Utc>) -> Result<CustomerFields, AppError> {
        let tags = normalize_tags(self.tags).map_err(|e| AppError::Validation(field_error("tags", e)))?;

        let custom_fields = match self.custom_fields {
            None | Some(serde_json::Value::Null) => serde_json::json!({}),
            Some(value @ serde_json::Value::Object(_)) => value,
            Some(_) => {
                return Err(AppError::Validation(field_error(
                    "custom_fields",
                    ValidationError::new("object"),
                )))
            }
        };

        let mut fields = CustomerFields {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address_line: self.address_line,
            city: self.city,
            postcode: self.postcode,
            status: self.status.unwrap_or_default(),
            marketing_consent: self.marketing_consent,
            sales_consent: self.sales_consent,
            gdpr_consent: self.gdpr_consent,
            consent_date: self.consent_date,
            tags,
            custom_fields,
            notes: self.notes,
        };
        fields.apply_consent_rule(now);
        Ok(fields)
    }
}
