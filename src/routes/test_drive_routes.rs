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

use crate::controllers::test_drive_controller::TestDriveController;
use crate::dto::api_response::ApiResponse;
use crate::dto::test_drive_dto::{TestDriveListParams, TestDriveRequest};
use crate::models::test_drive::TestDriveEntry;
use crate::repositories::DealerScope;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_test_drive_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_test_drives).post(create_test_drive))
        .route("/:id", get(get_test_drive).put(update_test_drive))
}

async fn list_test_drives(
    Extension(scope): Extension<DealerScope>,
    params: Result<Query<TestDriveListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<TestDriveEntry>>>, AppError> {
    let Query(params) = params?;
    let controller = TestDriveController::new(scope);
    let response = controller.list(params).await?;
    Ok(Json(response))
}

async fn get_test_drive(
    Extension(scope): Extension<DealerScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<TestDriveEntry>>, AppError> {
    let Path(id) = id?;
    let controller = TestDriveController::new(scope);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_test_drive(
    Extension(scope): Extension<DealerScope>,
    payload: Result<Json<TestDriveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TestDriveEntry>>), AppError> {
    let Json(request) = payload?;
    let controller = TestDriveController::new(scope);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_test_drive(
    Extension(scope): Extension<DealerScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TestDriveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TestDriveEntry>>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let controller = TestDriveController::new(scope);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}
