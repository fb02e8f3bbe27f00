//! Cliente HTTP de la API
//!
//! Este módulo contiene `ResourceClient`, que envía el token del proveedor
//! de identidad como `Bearer` y decodifica el sobre `{ success, data, error, count }`.
//! Una respuesta con `success: false` se convierte en `ClientError::Api`.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dto::api_response::ApiResponse;

/// Rutas de los recursos bajo `/api`
pub mod paths {
    pub const CUSTOMERS: &str = "customers";
    pub const TEST_DRIVES: &str = "test-drives";
    pub const VEHICLE_COSTS: &str = "vehicle-costs";
    pub const RETURN_COSTS: &str = "return-costs";
    pub const DEALER: &str = "dealer";
    pub const DEALER_ONBOARD: &str = "dealer/onboard";
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("unexpected response ({status}): {reason}")]
    Decode { status: StatusCode, reason: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } | ClientError::Decode { status, .. } => Some(*status),
        }
    }
}

/// Resultado de un listado: filas y `count` del sobre
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub count: usize,
}

/// Cliente tipado de la API del concesionario
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ResourceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Token del proveedor de identidad enviado en cada petición
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResponse<T>, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            status,
            reason: e.to_string(),
        })?;

        if !envelope.success || !status.is_success() {
            let message = envelope
                .error
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::debug!("⚠️ API {} -> {}", status, message);
            return Err(ClientError::Api { status, message });
        }
        Ok(envelope)
    }

    fn into_data<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
        envelope.data.ok_or_else(|| ClientError::Decode {
            status: StatusCode::OK,
            reason: "missing data field".to_string(),
        })
    }

    /// `GET /api/<path>` con parámetros de consulta
    pub async fn list<T, Q>(&self, path: &str, params: &Q) -> Result<ListResult<T>, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let envelope = self
            .send::<Vec<T>>(self.http.get(self.url(path)).query(params))
            .await?;
        let count = envelope.count;
        let items = Self::into_data(envelope)?;
        Ok(ListResult {
            count: count.unwrap_or(items.len()),
            items,
        })
    }

    /// `GET /api/<path>` sin parámetros, devolviendo `data` tal cual
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let envelope = self.send(self.http.get(self.url(path))).await?;
        Self::into_data(envelope)
    }

    /// `GET /api/<path>/<id>`
    pub async fn get<T: DeserializeOwned>(&self, path: &str, id: Uuid) -> Result<T, ClientError> {
        self.fetch(&format!("{}/{}", path, id)).await
    }

    /// `POST /api/<path>`
    pub async fn create<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::into_data(envelope)
    }

    /// `PUT /api/<path>/<id>`
    pub async fn update<T, B>(&self, path: &str, id: Uuid, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(&format!("{}/{}", path, id));
        let envelope = self.send(self.http.put(url).json(body)).await?;
        Self::into_data(envelope)
    }

    /// `PUT /api/<path>` para recursos sin id (perfil del concesionario)
    pub async fn replace<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.send(self.http.put(self.url(path)).json(body)).await?;
        Self::into_data(envelope)
    }

    /// `POST /api/documents/pdf`: devuelve los bytes del PDF
    pub async fn export_pdf<B: Serialize + ?Sized>(&self, request: &B) -> Result<Vec<u8>, ClientError> {
        let response = self
            .authorize(self.http.post(self.url("documents/pdf")).json(request))
            .send()
            .await?;
        let status = response.status();
        let is_pdf = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/pdf"))
            .unwrap_or(false);

        if status.is_success() && is_pdf {
            return Ok(response.bytes().await?.to_vec());
        }

        let bytes = response.bytes().await?;
        let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&bytes)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(ClientError::Api { status, message })
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        self.fetch("health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_under_api() {
        let client = ResourceClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.url(paths::CUSTOMERS), "http://localhost:3000/api/customers");
        assert_eq!(client.url("/dealer/onboard"), "http://localhost:3000/api/dealer/onboard");
    }

    #[test]
    fn api_errors_expose_status() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Customer not found".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "API error (404 Not Found): Customer not found");
    }
}
