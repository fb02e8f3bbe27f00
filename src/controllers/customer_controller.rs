use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{page_limit, parse_param};
use crate::dto::api_response::ApiResponse;
use crate::dto::customer_dto::{CustomerListParams, CustomerRequest};
use crate::models::customer::{Customer, CustomerQuery, CustomerSort, CustomerStatus};
use crate::models::SortOrder;
use crate::repositories::DealerScope;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalize_search_term;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

pub struct CustomerController {
    scope: DealerScope,
}

impl CustomerController {
    pub fn new(scope: DealerScope) -> Self {
        Self { scope }
    }

    pub async fn list(&self, params: CustomerListParams) -> Result<ApiResponse<Vec<Customer>>, AppError> {
        let query = customer_query(&params)?;
        let customers = self.scope.list_customers(&query).await?;
        Ok(ApiResponse::list(customers))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ApiResponse<Customer>, AppError> {
        let customer = self
            .scope
            .find_customer(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))?;

        Ok(ApiResponse::success(customer))
    }

    pub async fn create(&self, request: CustomerRequest) -> Result<ApiResponse<Customer>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let fields = request.into_fields(Utc::now())?;
        let customer = self.scope.create_customer(fields).await?;
        tracing::info!("✅ Cliente {} creado para el concesionario {}", customer.id, self.scope.dealer_id());

        Ok(ApiResponse::success_with_message(customer, "Customer created"))
    }

    pub async fn update(&self, id: Uuid, request: CustomerRequest) -> Result<ApiResponse<Customer>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let fields = request.into_fields(Utc::now())?;
        let customer = self
            .scope
            .update_customer(id, fields)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(customer, "Customer updated"))
    }
}

/// Convierte los parámetros de la URL en una consulta acotada
pub fn customer_query(params: &CustomerListParams) -> Result<CustomerQuery, AppError> {
    let sort = parse_param::<CustomerSort>("sort", params.sort.as_deref())?.unwrap_or_default();
    let order = parse_param::<SortOrder>("order", params.order.as_deref())?.unwrap_or_else(|| sort.default_order());

    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::BadRequest("offset must not be negative".to_string()));
    }

    Ok(CustomerQuery {
        search: normalize_search_term(params.search.as_deref()),
        status: parse_param::<CustomerStatus>("status", params.status.as_deref())?,
        sort,
        order,
        limit: page_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT)?,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_newest_first() {
        let query = customer_query(&CustomerListParams::default()).unwrap();
        assert_eq!(query.sort, CustomerSort::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.limit, 50);
        assert_eq!(query.search, None);
    }

    #[test]
    fn text_sorts_default_to_ascending() {
        let params = CustomerListParams {
            sort: Some("last_name".into()),
            search: Some("  smi ".into()),
            ..Default::default()
        };
        let query = customer_query(&params).unwrap();
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.search.as_deref(), Some("smi"));
    }

    #[test]
    fn rejects_unknown_sort_column() {
        let params = CustomerListParams {
            sort: Some("password".into()),
            ..Default::default()
        };
        assert!(matches!(customer_query(&params), Err(AppError::BadRequest(_))));
    }
}
