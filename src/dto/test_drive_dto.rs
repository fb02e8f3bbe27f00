use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::test_drive::{TestDriveFields, TestDriveStatus, DEFAULT_DURATION_MINUTES};
use crate::utils::validation::{deserialize_time, trim_optional};

// Parámetros de consulta del listado de pruebas de conducción
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestDriveListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

// Request para crear o reemplazar una prueba de conducción
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestDriveRequest {
    #[validate(length(min = 1, max = 200), custom = "crate::utils::validation::validate_not_blank")]
    pub customer_name: String,

    #[validate(email, length(max = 254))]
    pub customer_email: String,

    #[validate(regex = "crate::utils::validation::PHONE_REGEX")]
    pub customer_phone: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_blank")]
    pub vehicle_make: String,

    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_blank")]
    pub vehicle_model: String,

    #[validate(regex = "crate::utils::validation::REGISTRATION_REGEX")]
    pub vehicle_registration: Option<String>,

    #[validate(length(max = 50))]
    pub vehicle_stock_number: Option<String>,

    pub drive_date: NaiveDate,

    #[serde(deserialize_with = "deserialize_time")]
    pub drive_time: NaiveTime,

    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: Option<i32>,

    #[serde(default)]
    pub status: Option<TestDriveStatus>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl TestDriveRequest {
    pub fn normalized(self) -> Self {
        Self {
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: trim_optional(self.customer_phone),
            vehicle_make: self.vehicle_make.trim().to_string(),
            vehicle_model: self.vehicle_model.trim().to_string(),
            vehicle_registration: trim_optional(self.vehicle_registration).map(|r| r.to_uppercase()),
            vehicle_stock_number: trim_optional(self.vehicle_stock_number),
            notes: trim_optional(self.notes),
            ..self
        }
    }

    pub fn into_fields(self) -> TestDriveFields {
        TestDriveFields {
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            vehicle_make: self.vehicle_make,
            vehicle_model: self.vehicle_model,
            vehicle_registration: self.vehicle_registration,
            vehicle_stock_number: self.vehicle_stock_number,
            drive_date: self.drive_date,
            drive_time: self.drive_time,
            duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: self.status.unwrap_or_default(),
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(extra: serde_json::Value) -> serde_json::Value {
        let mut base = serde_json::json!({
            "customer_name": "Ann Smith",
            "customer_email": "ann@example.com",
            "vehicle_make": "Ford",
            "vehicle_model": "Puma",
            "drive_date": "2024-06-01",
            "drive_time": "14:30"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base
    }

    #[test]
    fn defaults_duration_and_status() {
        let req: TestDriveRequest = serde_json::from_value(body(serde_json::json!({}))).unwrap();
        let req = req.normalized();
        assert!(req.validate().is_ok());

        let fields = req.into_fields();
        assert_eq!(fields.duration_minutes, 30);
        assert_eq!(fields.status, TestDriveStatus::Scheduled);
        assert_eq!(fields.drive_time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn rejects_out_of_range_duration() {
        let req: TestDriveRequest =
            serde_json::from_value(body(serde_json::json!({ "duration_minutes": 5 }))).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_malformed_time() {
        let parsed = serde_json::from_value::<TestDriveRequest>(body(serde_json::json!({ "drive_time": "2pm" })));
        assert!(parsed.is_err());
    }

    #[test]
    fn registration_is_uppercased() {
        let req: TestDriveRequest =
            serde_json::from_value(body(serde_json::json!({ "vehicle_registration": " ab12 cde " }))).unwrap();
        let req = req.normalized();
        assert_eq!(req.vehicle_registration.as_deref(), Some("AB12 CDE"));
        assert!(req.validate().is_ok());
    }
}
