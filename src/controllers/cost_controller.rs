use super::page_limit;
use crate::dto::api_response::ApiResponse;
use crate::dto::cost_dto::{CostListParams, CostListResponse};
use crate::models::cost::{CostQuery, CostSummary, ReturnCost, VehicleCost, DEFAULT_COST_LIMIT, MAX_COST_LIMIT};
use crate::repositories::DealerScope;
use crate::utils::errors::AppError;
use crate::utils::validation::trim_optional;

pub struct CostController {
    scope: DealerScope,
}

impl CostController {
    pub fn new(scope: DealerScope) -> Self {
        Self { scope }
    }

    pub async fn list_vehicle_costs(
        &self,
        params: CostListParams,
    ) -> Result<ApiResponse<CostListResponse<VehicleCost>>, AppError> {
        let query = cost_query(params)?;
        let costs = self.scope.list_vehicle_costs(&query).await?;
        let summary = self.scope.vehicle_cost_summary(&query).await?;

        Ok(cost_page(costs, summary, &query))
    }

    pub async fn list_return_costs(
        &self,
        params: CostListParams,
    ) -> Result<ApiResponse<CostListResponse<ReturnCost>>, AppError> {
        let query = cost_query(params)?;
        let costs = self.scope.list_return_costs(&query).await?;
        let summary = self.scope.return_cost_summary(&query).await?;

        Ok(cost_page(costs, summary, &query))
    }
}

fn cost_page<T>(items: Vec<T>, summary: CostSummary, query: &CostQuery) -> ApiResponse<CostListResponse<T>> {
    let count = items.len();
    ApiResponse::success(CostListResponse {
        items,
        total: summary.total,
        entries: summary.entries,
        limit: query.limit,
        offset: query.offset,
    })
    .with_count(count)
}

fn cost_query(params: CostListParams) -> Result<CostQuery, AppError> {
    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::BadRequest("offset must not be negative".to_string()));
    }

    Ok(CostQuery {
        stock_number: trim_optional(params.stock_number),
        limit: page_limit(params.limit, DEFAULT_COST_LIMIT, MAX_COST_LIMIT)?,
        offset,
    })
}
