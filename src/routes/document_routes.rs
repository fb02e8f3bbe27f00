use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::document_controller::DocumentController;
use crate::dto::document_dto::DocumentRequest;
use crate::repositories::DealerScope;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_document_router() -> Router<AppState> {
    Router::new().route("/pdf", post(export_pdf))
}

async fn export_pdf(
    Extension(scope): Extension<DealerScope>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let controller = DocumentController::new(scope);
    let document = controller.export(request).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];
    Ok((headers, document.bytes).into_response())
}
