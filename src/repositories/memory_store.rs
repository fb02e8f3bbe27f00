//! Almacenamiento en memoria
//!
//! Este módulo implementa `Store` sobre tablas en memoria protegidas por un
//! `RwLock`. Se usa para demos locales (`STORAGE_BACKEND=memory`) y en los
//! tests HTTP. Cada operación de repositorio cuenta como una consulta.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::customer_repository::DUPLICATE_EMAIL;
use super::{CostRepository, CustomerRepository, DealerRepository, Store, TestDriveRepository};
use crate::models::cost::{total_amount, CostQuery, CostSummary, NewReturnCost, NewVehicleCost, ReturnCost, VehicleCost};
use crate::models::customer::{Customer, CustomerFields, CustomerQuery};
use crate::models::dealer::{Dealer, DealerId, DealerProfile, NewDealer};
use crate::models::test_drive::{TestDriveEntry, TestDriveFields, TestDriveQuery};
use crate::models::SortOrder;
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    dealers: Vec<Dealer>,
    customers: Vec<Customer>,
    test_drives: Vec<TestDriveEntry>,
    vehicle_costs: Vec<VehicleCost>,
    return_costs: Vec<ReturnCost>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de operaciones de repositorio ejecutadas
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    /// Carga un concesionario sin pasar por el contador de consultas
    pub async fn insert_dealer(&self, dealer: NewDealer) -> Dealer {
        let now = Utc::now();
        let row = Dealer {
            id: DealerId::new(),
            external_user_id: dealer.external_user_id,
            business_name: dealer.profile.business_name,
            contact_email: dealer.profile.contact_email,
            phone: dealer.profile.phone,
            address: dealer.profile.address,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.dealers.push(row.clone());
        row
    }

    /// Carga un cliente sin pasar por el contador de consultas
    pub async fn insert_customer(&self, dealer_id: DealerId, fields: CustomerFields) -> AppResult<Customer> {
        let mut tables = self.tables.write().await;
        insert_customer_row(&mut tables, dealer_id, fields)
    }

    /// Carga una prueba de conducción sin pasar por el contador de consultas
    pub async fn insert_test_drive(&self, dealer_id: DealerId, fields: TestDriveFields) -> TestDriveEntry {
        let row = test_drive_row(Uuid::new_v4(), dealer_id, fields, Utc::now());
        self.tables.write().await.test_drives.push(row.clone());
        row
    }

    pub async fn insert_vehicle_cost(&self, dealer_id: DealerId, cost: NewVehicleCost) -> VehicleCost {
        let row = VehicleCost {
            id: Uuid::new_v4(),
            dealer_id,
            stock_number: cost.stock_number,
            vehicle_description: cost.vehicle_description,
            category: cost.category,
            description: cost.description,
            amount: cost.amount,
            incurred_on: cost.incurred_on,
            created_at: Utc::now(),
        };
        self.tables.write().await.vehicle_costs.push(row.clone());
        row
    }

    pub async fn insert_return_cost(&self, dealer_id: DealerId, cost: NewReturnCost) -> ReturnCost {
        let row = ReturnCost {
            id: Uuid::new_v4(),
            dealer_id,
            stock_number: cost.stock_number,
            vehicle_description: cost.vehicle_description,
            reason: cost.reason,
            amount: cost.amount,
            returned_on: cost.returned_on,
            created_at: Utc::now(),
        };
        self.tables.write().await.return_costs.push(row.clone());
        row
    }
}

fn email_taken(tables: &Tables, dealer_id: DealerId, email: &str, except: Option<Uuid>) -> bool {
    tables.customers.iter().any(|c| {
        c.dealer_id == dealer_id && Some(c.id) != except && c.email.to_lowercase() == email.to_lowercase()
    })
}

fn insert_customer_row(tables: &mut Tables, dealer_id: DealerId, fields: CustomerFields) -> AppResult<Customer> {
    if email_taken(tables, dealer_id, &fields.email, None) {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let now = Utc::now();
    let row = Customer {
        id: Uuid::new_v4(),
        dealer_id,
        first_name: fields.first_name,
        last_name: fields.last_name,
        email: fields.email,
        phone: fields.phone,
        address_line: fields.address_line,
        city: fields.city,
        postcode: fields.postcode,
        status: fields.status,
        marketing_consent: fields.marketing_consent,
        sales_consent: fields.sales_consent,
        gdpr_consent: fields.gdpr_consent,
        consent_date: fields.consent_date,
        tags: Json(fields.tags),
        custom_fields: Json(fields.custom_fields),
        notes: fields.notes,
        created_at: now,
        updated_at: now,
    };
    tables.customers.push(row.clone());
    Ok(row)
}

fn test_drive_row(id: Uuid, dealer_id: DealerId, fields: TestDriveFields, now: chrono::DateTime<Utc>) -> TestDriveEntry {
    TestDriveEntry {
        id,
        dealer_id,
        customer_name: fields.customer_name,
        customer_email: fields.customer_email,
        customer_phone: fields.customer_phone,
        vehicle_make: fields.vehicle_make,
        vehicle_model: fields.vehicle_model,
        vehicle_registration: fields.vehicle_registration,
        vehicle_stock_number: fields.vehicle_stock_number,
        drive_date: fields.drive_date,
        drive_time: fields.drive_time,
        duration_minutes: fields.duration_minutes,
        status: fields.status,
        notes: fields.notes,
        created_at: now,
        updated_at: now,
    }
}

/// Aplica `limit`/`offset` de la misma forma que SQL
fn page<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl DealerRepository for MemoryStore {
    async fn find_dealer_by_external_id(&self, external_user_id: &str) -> AppResult<Option<Dealer>> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables
            .dealers
            .iter()
            .find(|d| d.external_user_id == external_user_id)
            .cloned())
    }

    async fn create_dealer_if_absent(&self, dealer: NewDealer) -> AppResult<(Dealer, bool)> {
        self.record_query();
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .dealers
            .iter()
            .find(|d| d.external_user_id == dealer.external_user_id)
        {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let row = Dealer {
            id: DealerId::new(),
            external_user_id: dealer.external_user_id,
            business_name: dealer.profile.business_name,
            contact_email: dealer.profile.contact_email,
            phone: dealer.profile.phone,
            address: dealer.profile.address,
            created_at: now,
            updated_at: now,
        };
        tables.dealers.push(row.clone());
        Ok((row, true))
    }

    async fn update_dealer_profile(&self, dealer_id: DealerId, profile: DealerProfile) -> AppResult<Dealer> {
        self.record_query();
        let mut tables = self.tables.write().await;
        let dealer = tables
            .dealers
            .iter_mut()
            .find(|d| d.id == dealer_id)
            .ok_or_else(|| AppError::NotFound("Dealer profile not found".to_string()))?;

        dealer.business_name = profile.business_name;
        dealer.contact_email = profile.contact_email;
        dealer.phone = profile.phone;
        dealer.address = profile.address;
        dealer.updated_at = Utc::now();
        Ok(dealer.clone())
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn list_customers(&self, dealer_id: DealerId, query: &CustomerQuery) -> AppResult<Vec<Customer>> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut rows: Vec<Customer> = tables
            .customers
            .iter()
            .filter(|c| c.dealer_id == dealer_id)
            .filter(|c| query.status.map_or(true, |s| c.status == s))
            .filter(|c| query.search.as_deref().map_or(true, |term| c.matches_search(term)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = query.sort.compare(a, b);
            let ordering = match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        Ok(page(rows, query.limit, query.offset))
    }

    async fn find_customer(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<Customer>> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .find(|c| c.id == id && c.dealer_id == dealer_id)
            .cloned())
    }

    async fn create_customer(&self, dealer_id: DealerId, fields: CustomerFields) -> AppResult<Customer> {
        self.record_query();
        let mut tables = self.tables.write().await;
        insert_customer_row(&mut tables, dealer_id, fields)
    }

    async fn update_customer(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: CustomerFields,
    ) -> AppResult<Option<Customer>> {
        self.record_query();
        let mut tables = self.tables.write().await;
        if !tables.customers.iter().any(|c| c.id == id && c.dealer_id == dealer_id) {
            return Ok(None);
        }
        if email_taken(&tables, dealer_id, &fields.email, Some(id)) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let Some(customer) = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.dealer_id == dealer_id)
        else {
            return Ok(None);
        };

        customer.first_name = fields.first_name;
        customer.last_name = fields.last_name;
        customer.email = fields.email;
        customer.phone = fields.phone;
        customer.address_line = fields.address_line;
        customer.city = fields.city;
        customer.postcode = fields.postcode;
        customer.status = fields.status;
        customer.marketing_consent = fields.marketing_consent;
        customer.sales_consent = fields.sales_consent;
        customer.gdpr_consent = fields.gdpr_consent;
        customer.consent_date = fields.consent_date;
        customer.tags = Json(fields.tags);
        customer.custom_fields = Json(fields.custom_fields);
        customer.notes = fields.notes;
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }
}

#[async_trait]
impl TestDriveRepository for MemoryStore {
    async fn list_test_drives(&self, dealer_id: DealerId, query: &TestDriveQuery) -> AppResult<Vec<TestDriveEntry>> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut rows: Vec<TestDriveEntry> = tables
            .test_drives
            .iter()
            .filter(|t| t.dealer_id == dealer_id)
            .filter(|t| query.date.map_or(true, |d| t.drive_date == d))
            .filter(|t| query.status.map_or(true, |s| t.status == s))
            .filter(|t| query.search.as_deref().map_or(true, |term| t.matches_search(term)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            a.drive_date
                .cmp(&b.drive_date)
                .then_with(|| a.drive_time.cmp(&b.drive_time))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(page(rows, query.limit, 0))
    }

    async fn find_test_drive(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<TestDriveEntry>> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables
            .test_drives
            .iter()
            .find(|t| t.id == id && t.dealer_id == dealer_id)
            .cloned())
    }

    async fn create_test_drive(&self, dealer_id: DealerId, fields: TestDriveFields) -> AppResult<TestDriveEntry> {
        self.record_query();
        let row = test_drive_row(Uuid::new_v4(), dealer_id, fields, Utc::now());
        self.tables.write().await.test_drives.push(row.clone());
        Ok(row)
    }

    async fn update_test_drive(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: TestDriveFields,
    ) -> AppResult<Option<TestDriveEntry>> {
        self.record_query();
        let mut tables = self.tables.write().await;
        let Some(entry) = tables
            .test_drives
            .iter_mut()
            .find(|t| t.id == id && t.dealer_id == dealer_id)
        else {
            return Ok(None);
        };

        let created_at = entry.created_at;
        *entry = test_drive_row(id, dealer_id, fields, Utc::now());
        entry.created_at = created_at;
        Ok(Some(entry.clone()))
    }
}

fn cost_matches(query: &CostQuery, dealer_id: DealerId, row_dealer: DealerId, stock_number: &str) -> bool {
    row_dealer == dealer_id && query.stock_number.as_deref().map_or(true, |s| stock_number == s)
}

fn cost_summary<'a>(amounts: impl Iterator<Item = &'a Decimal>) -> CostSummary {
    let amounts: Vec<_> = amounts.collect();
    CostSummary {
        entries: amounts.len() as i64,
        total: total_amount(amounts),
    }
}

#[async_trait]
impl CostRepository for MemoryStore {
    async fn list_vehicle_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<VehicleCost>> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut rows: Vec<VehicleCost> = tables
            .vehicle_costs
            .iter()
            .filter(|c| cost_matches(query, dealer_id, c.dealer_id, &c.stock_number))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(page(rows, query.limit, query.offset))
    }

    async fn list_return_costs(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<Vec<ReturnCost>> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut rows: Vec<ReturnCost> = tables
            .return_costs
            .iter()
            .filter(|c| cost_matches(query, dealer_id, c.dealer_id, &c.stock_number))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(page(rows, query.limit, query.offset))
    }

    async fn vehicle_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(cost_summary(
            tables
                .vehicle_costs
                .iter()
                .filter(|c| cost_matches(query, dealer_id, c.dealer_id, &c.stock_number))
                .map(|c| &c.amount),
        ))
    }

    async fn return_cost_summary(&self, dealer_id: DealerId, query: &CostQuery) -> AppResult<CostSummary> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(cost_summary(
            tables
                .return_costs
                .iter()
                .filter(|c| cost_matches(query, dealer_id, c.dealer_id, &c.stock_number))
                .map(|c| &c.amount),
        ))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
