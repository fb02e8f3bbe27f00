//! Utilidades compartidas de los tests HTTP
//!
//! Monta la aplicación sobre un `MemoryStore`, firma tokens HS256 como lo
//! haría el proveedor de identidad y ejecuta peticiones con `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use dealership_manager::config::EnvironmentConfig;
use dealership_manager::models::customer::{CustomerFields, CustomerStatus};
use dealership_manager::models::dealer::{Dealer, DealerProfile, NewDealer};
use dealership_manager::models::test_drive::{TestDriveFields, TestDriveStatus};
use dealership_manager::repositories::{MemoryStore, Store};
use dealership_manager::services::identity_service::{IdentityClaims, IdentityVerifier};
use dealership_manager::{create_app, AppState};

pub const TEST_SECRET: &str = "test-identity-secret";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();
        Self::with_store(store, shared)
    }

    /// Monta el router sobre `backend`; `store` sirve para sembrar datos
    pub fn with_store(store: Arc<MemoryStore>, backend: Arc<dyn Store>) -> Self {
        let config = EnvironmentConfig::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("test".to_string()),
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "IDENTITY_JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let identity = IdentityVerifier::from_config(&config.identity).unwrap();
        let router = create_app(AppState::new(backend, identity, config));

        Self { store, router }
    }

    /// Crea un concesionario para el usuario `external_id` del proveedor de identidad
    pub async fn seed_dealer(&self, external_id: &str, business_name: &str) -> Dealer {
        self.store
            .insert_dealer(NewDealer {
                external_user_id: external_id.to_string(),
                profile: DealerProfile {
                    business_name: business_name.to_string(),
                    contact_email: Some(format!("{}@dealers.test", external_id)),
                    phone: None,
                    address: Some("1 High Street".to_string()),
                },
            })
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Petición JSON; devuelve el estado y el cuerpo (o `Null` si no es JSON)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(build_request(method, uri, token, body)).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }
}

pub fn build_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = read_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Token firmado con el secreto de test, válido una hora
pub fn token_for(external_id: &str) -> String {
    sign(external_id, Utc::now().timestamp() + 3600)
}

pub fn expired_token_for(external_id: &str) -> String {
    sign(external_id, Utc::now().timestamp() - 3600)
}

fn sign(external_id: &str, exp: i64) -> String {
    let claims = IdentityClaims {
        sub: external_id.to_string(),
        exp: exp as usize,
        email: Some(format!("{}@identity.test", external_id)),
        iss: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap()
}

pub fn customer_fields(first_name: &str, last_name: &str, email: &str) -> CustomerFields {
    CustomerFields {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: None,
        address_line: None,
        city: None,
        postcode: None,
        status: CustomerStatus::Lead,
        marketing_consent: false,
        sales_consent: false,
        gdpr_consent: false,
        consent_date: None,
        tags: Vec::new(),
        custom_fields: serde_json::json!({}),
        notes: None,
    }
}

pub fn test_drive_fields(customer_name: &str, make: &str, model: &str, date: &str, time: &str) -> TestDriveFields {
    TestDriveFields {
        customer_name: customer_name.to_string(),
        customer_email: format!("{}@example.com", customer_name.to_lowercase().replace(' ', ".")),
        customer_phone: None,
        vehicle_make: make.to_string(),
        vehicle_model: model.to_string(),
        vehicle_registration: None,
        vehicle_stock_number: None,
        drive_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        drive_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        duration_minutes: 30,
        status: TestDriveStatus::Scheduled,
        notes: None,
    }
}
