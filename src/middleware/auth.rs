//! Middleware de identidad
//!
//! Este módulo extrae el token del proveedor de identidad (cabecera
//! `Authorization: Bearer` o cookie `__session`), lo verifica e inyecta la
//! `Identity` en las extensions. Sin token válido responde 401 sin tocar el
//! almacenamiento.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Cookie de sesión que el proveedor de identidad fija en navegadores
pub const SESSION_COOKIE: &str = "__session";

/// Middleware de identidad
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let identity = state.identity.verify(&token)?;
    tracing::debug!("Identidad verificada: {}", identity.external_user_id);

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Token de la cabecera `Authorization` o, en su defecto, de la cookie de sesión
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}
