use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use super::{page_limit, parse_param};
use crate::dto::api_response::ApiResponse;
use crate::dto::test_drive_dto::{TestDriveListParams, TestDriveRequest};
use crate::models::test_drive::{TestDriveEntry, TestDriveQuery, TestDriveStatus};
use crate::repositories::DealerScope;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{normalize_search_term, validate_date};

const DEFAULT_LIMIT: i64 = 200;
const MAX_LIMIT: i64 = 500;

pub struct TestDriveController {
    scope: DealerScope,
}

impl TestDriveController {
    pub fn new(scope: DealerScope) -> Self {
        Self { scope }
    }

    pub async fn list(&self, params: TestDriveListParams) -> Result<ApiResponse<Vec<TestDriveEntry>>, AppError> {
        let query = test_drive_query(&params)?;
        let entries = self.scope.list_test_drives(&query).await?;
        Ok(ApiResponse::list(entries))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ApiResponse<TestDriveEntry>, AppError> {
        let entry = self
            .scope
            .find_test_drive(id)
            .await?
            .ok_or_else(|| not_found_error("Test drive", &id.to_string()))?;

        Ok(ApiResponse::success(entry))
    }

    pub async fn create(&self, request: TestDriveRequest) -> Result<ApiResponse<TestDriveEntry>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let entry = self.scope.create_test_drive(request.into_fields()).await?;
        tracing::info!(
            "🚗 Prueba de conducción {} reservada para {} {}",
            entry.id,
            entry.drive_date,
            entry.drive_time
        );

        Ok(ApiResponse::success_with_message(entry, "Test drive scheduled"))
    }

    pub async fn update(&self, id: Uuid, request: TestDriveRequest) -> Result<ApiResponse<TestDriveEntry>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let entry = self
            .scope
            .update_test_drive(id, request.into_fields())
            .await?
            .ok_or_else(|| not_found_error("Test drive", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(entry, "Test drive updated"))
    }
}

pub fn test_drive_query(params: &TestDriveListParams) -> Result<TestDriveQuery, AppError> {
    let date = match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            validate_date(raw)
                .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))?,
        ),
        None => None::<NaiveDate>,
    };

    Ok(TestDriveQuery {
        date,
        status: parse_param::<TestDriveStatus>("status", params.status.as_deref())?,
        search: normalize_search_term(params.search.as_deref()),
        limit: page_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT)?,
    })
}
