use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::dealer_controller::{DealerController, OnboardingController};
use crate::dto::api_response::ApiResponse;
use crate::dto::dealer_dto::DealerProfileRequest;
use crate::models::dealer::Dealer;
use crate::repositories::DealerScope;
use crate::services::identity_service::Identity;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Perfil del concesionario resuelto (identidad + concesionario)
pub fn create_dealer_router() -> Router<AppState> {
    Router::new().route("/dealer", get(get_dealer).put(update_dealer))
}

/// Alta del concesionario (solo identidad)
pub fn create_onboarding_router() -> Router<AppState> {
    Router::new().route("/dealer/onboard", post(onboard_dealer))
}

async fn get_dealer(Extension(scope): Extension<DealerScope>) -> Json<ApiResponse<Dealer>> {
    Json(DealerController::new(scope).get_profile())
}

async fn update_dealer(
    Extension(scope): Extension<DealerScope>,
    payload: Result<Json<DealerProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Dealer>>, AppError> {
    let Json(request) = payload?;
    let controller = DealerController::new(scope);
    let response = controller.update_profile(request).await?;
    Ok(Json(response))
}

async fn onboard_dealer(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<DealerProfileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Dealer>>), AppError> {
    let Json(request) = payload?;
    let controller = OnboardingController::new(state.store.clone());
    let (response, created) = controller.onboard(&identity, request).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(response)))
}
