//! Middleware de concesionario
//!
//! Este módulo resuelve el concesionario de la identidad verificada y monta
//! el `DealerScope` con el que trabajan los controladores. Una identidad sin
//! concesionario es un error de alta (404), no un fallo transitorio.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::repositories::DealerScope;
use crate::services::identity_service::Identity;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware de resolución de concesionario
pub async fn dealer_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let dealer = state
        .store
        .find_dealer_by_external_id(&identity.external_user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("⚠️ Usuario {} sin concesionario asociado", identity.external_user_id);
            AppError::NotFound("Dealer profile not found".to_string())
        })?;

    request
        .extensions_mut()
        .insert(DealerScope::new(dealer, state.store.clone()));
    Ok(next.run(request).await)
}
