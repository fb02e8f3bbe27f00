use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::cost_controller::CostController;
use crate::dto::api_response::ApiResponse;
use crate::dto::cost_dto::{CostListParams, CostListResponse};
use crate::models::cost::{ReturnCost, VehicleCost};
use crate::repositories::DealerScope;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_cost_router() -> Router<AppState> {
    Router::new().route("/", get(list_vehicle_costs))
}

pub fn create_return_cost_router() -> Router<AppState> {
    Router::new().route("/", get(list_return_costs))
}

async fn list_vehicle_costs(
    Extension(scope): Extension<DealerScope>,
    params: Result<Query<CostListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CostListResponse<VehicleCost>>>, AppError> {
    let Query(params) = params?;
    let controller = CostController::new(scope);
    let response = controller.list_vehicle_costs(params).await?;
    Ok(Json(response))
}

async fn list_return_costs(
    Extension(scope): Extension<DealerScope>,
    params: Result<Query<CostListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CostListResponse<ReturnCost>>>, AppError> {
    let Query(params) = params?;
    let controller = CostController::new(scope);
    let response = controller.list_return_costs(params).await?;
    Ok(Json(response))
}
