//! Acceso a datos acotado a un concesionario
//!
//! `DealerScope` lo construye el middleware de concesionario y es la única
//! forma que tienen los controladores de llegar al almacenamiento: cada
//! método inyecta el `DealerId` resuelto a partir de la identidad.

use std::sync::Arc;

use uuid::Uuid;

use super::Store;
use crate::models::cost::{CostQuery, CostSummary, ReturnCost, VehicleCost};
use crate::models::customer::{Customer, CustomerFields, CustomerQuery};
use crate::models::dealer::{Dealer, DealerId, DealerProfile};
use crate::models::test_drive::{TestDriveEntry, TestDriveFields, TestDriveQuery};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct DealerScope {
    dealer: Dealer,
    store: Arc<dyn Store>,
}

impl DealerScope {
    pub(crate) fn new(dealer: Dealer, store: Arc<dyn Store>) -> Self {
        Self { dealer, store }
    }

    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    pub fn dealer_id(&self) -> DealerId {
        self.dealer.id
    }

    pub async fn update_profile(&self, profile: DealerProfile) -> AppResult<Dealer> {
        self.store.update_dealer_profile(self.dealer.id, profile).await
    }

    pub async fn list_customers(&self, query: &CustomerQuery) -> AppResult<Vec<Customer>> {
        self.store.list_customers(self.dealer.id, query).await
    }

    pub async fn find_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        self.store.find_customer(self.dealer.id, id).await
    }

    pub async fn create_customer(&self, fields: CustomerFields) -> AppResult<Customer> {
        self.store.create_customer(self.dealer.id, fields).await
    }

    pub async fn update_customer(&self, id: Uuid, fields: CustomerFields) -> AppResult<Option<Customer>> {
        self.store.update_customer(self.dealer.id, id, fields).await
    }

    pub async fn list_test_drives(&self, query: &TestDriveQuery) -> AppResult<Vec<TestDriveEntry>> {
        self.store.list_test_drives(self.dealer.id, query).await
    }

    pub async fn find_test_drive(&self, id: Uuid) -> AppResult<Option<TestDriveEntry>> {
        self.store.find_test_drive(self.dealer.id, id).await
    }

    pub async fn create_test_drive(&self, fields: TestDriveFields) -> AppResult<TestDriveEntry> {
        self.store.create_test_drive(self.dealer.id, fields).await
    }

    pub async fn update_test_drive(&self, id: Uuid, fields: TestDriveFields) -> AppResult<Option<TestDriveEntry>> {
        self.store.update_test_drive(self.dealer.id, id, fields).await
    }

    pub async fn list_vehicle_costs(&self, query: &CostQuery) -> AppResult<Vec<VehicleCost>> {
        self.store.list_vehicle_costs(self.dealer.id, query).await
    }

    pub async fn list_return_costs(&self, query: &CostQuery) -> AppResult<Vec<ReturnCost>> {
        self.store.list_return_costs(self.dealer.id, query).await
    }

    pub async fn vehicle_cost_summary(&self, query: &CostQuery) -> AppResult<CostSummary> {
        self.store.vehicle_cost_summary(self.dealer.id, query).await
    }

    pub async fn return_cost_summary(&self, query: &CostQuery) -> AppResult<CostSummary> {
        self.store.return_cost_summary(self.dealer.id, query).await
    }
}
