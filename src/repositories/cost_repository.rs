use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::postgres::PgStore;
use crate::models::cost::{CostQuery, CostSummary, ReturnCost, VehicleCost};
use crate::models::dealer::DealerId;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait CostRepository: Send + Sync {
    async fn list_vehicle_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<VehicleCost>>;

    async fn list_return_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<ReturnCost>>;

    /// Número de filas y suma de importes de todo el filtro, sin paginar
    async fn vehicle_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary>;

    async fn return_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary>;
}

/// `<select> FROM <table>` filtrado por concesionario y, opcionalmente, número de stock
fn cost_filter<'a>(select: &str, table: &str, dealer_id: DealerId, query: &'a CostQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("{} FROM {} WHERE dealer_id = ", select, table));
    builder.push_bind(dealer_id);

    if let Some(stock_number) = &query.stock_number {
        builder.push(" AND stock_number = ").push_bind(stock_number.as_str());
    }
    builder
}

fn cost_select<'a>(table: &str, dealer_id: DealerId, query: &'a CostQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = cost_filter("SELECT *", table, dealer_id, query);
    builder
        .push(" ORDER BY created_at DESC, id ASC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset);
    builder
}

const SUMMARY_SELECT: &str = "SELECT COUNT(*) AS entries, COALESCE(SUM(amount), 0) AS total";

#[async_trait]
impl CostRepository for PgStore {
    async fn list_vehicle_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<VehicleCost>> {
        let mut builder = cost_select("vehicle_costs", dealer_id, query);
        let costs = builder
            .build_query_as::<VehicleCost>()
            .fetch_all(self.pool())
            .await?;

        Ok(costs)
    }

    async fn list_return_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<ReturnCost>> {
        let mut builder = cost_select("return_costs", dealer_id, query);
        let costs = builder
            .build_query_as::<ReturnCost>()
            .fetch_all(self.pool())
            .await?;

        Ok(costs)
    }

    async fn vehicle_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary> {
        let mut builder = cost_filter(SUMMARY_SELECT, "vehicle_costs", dealer_id, query);
        let summary = builder
            .build_query_as::<CostSummary>()
            .fetch_one(self.pool())
            .await?;

        Ok(summary.in_cents())
    }

    async fn return_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary> {
        let mut builder = cost_filter(SUMMARY_SELECT, "return_costs", dealer_id, query);
        let summary = builder
            .build_query_as::<CostSummary>()
            .fetch_one(self.pool())
            .await?;

        Ok(summary.in_cents())
    }
}
