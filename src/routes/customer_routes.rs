use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_controller::CustomerController;
use crate::dto::api_response::ApiResponse;
use crate::dto::customer_dto::{CustomerListParams, CustomerRequest};
use crate::models::customer::Customer;
use crate::repositories::DealerScope;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer))
}

async fn list_customers(
    Extension(scope): Extension<DealerScope>,
    params: Result<Query<CustomerListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, AppError> {
    let Query(params) = params?;
    let controller = CustomerController::new(scope);
    let response = controller.list(params).await?;
    Ok(Json(response))
}

async fn get_customer(
    Extension(scope): Extension<DealerScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let Path(id) = id?;
    let controller = CustomerController::new(scope);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_customer(
    Extension(scope): Extension<DealerScope>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), AppError> {
    let Json(request) = payload?;
    let controller = CustomerController::new(scope);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_customer(
    Extension(scope): Extension<DealerScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let controller = CustomerController::new(scope);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}
