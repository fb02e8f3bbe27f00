use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::postgres::PgStore;
use crate::models::dealer::DealerId;
use crate::models::test_drive::{TestDriveEntry, TestDriveFields, TestDriveQuery};
use crate::utils::errors::AppResult;
use crate::utils::validation::like_pattern;

#[async_trait]
pub trait TestDriveRepository: Send + Sync {
    async fn list_test_drives(&self, dealer_id: DealerId, query: &TestDriveQuery) -> AppResult<Vec<TestDriveEntry>>;

    async fn find_test_drive(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<TestDriveEntry>>;

    async fn create_test_drive(&self, dealer_id: DealerId, fields: TestDriveFields) -> AppResult<TestDriveEntry>;

    async fn update_test_drive(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: TestDriveFields,
    ) -> AppResult<Option<TestDriveEntry>>;
}

#[async_trait]
impl TestDriveRepository for PgStore {
    async fn list_test_drives(&self, dealer_id: DealerId, query: &TestDriveQuery) -> AppResult<Vec<TestDriveEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM test_drive_entries WHERE dealer_id = ");
        builder.push_bind(dealer_id);

        if let Some(date) = query.date {
            builder.push(" AND drive_date = ").push_bind(date);
        }

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            builder
                .push(" AND (customer_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR customer_email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR vehicle_make ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR vehicle_model ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder
            .push(" ORDER BY drive_date ASC, drive_time ASC, id ASC LIMIT ")
            .push_bind(query.limit);

        let entries = builder
            .build_query_as::<TestDriveEntry>()
            .fetch_all(self.pool())
            .await?;

        Ok(entries)
    }

    async fn find_test_drive(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<TestDriveEntry>> {
        let entry = sqlx::query_as::<_, TestDriveEntry>(
            "SELECT * FROM test_drive_entries WHERE id = $1 AND dealer_id = $2",
        )
        .bind(id)
        .bind(dealer_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(entry)
    }

    async fn create_test_drive(&self, dealer_id: DealerId, fields: TestDriveFields) -> AppResult<TestDriveEntry> {
        let now = Utc::now();
        let entry = sqlx::query_as::<_, TestDriveEntry>(
            r#"
            INSERT INTO test_drive_entries (
                id, dealer_id, customer_name, customer_email, customer_phone, vehicle_make,
                vehicle_model, vehicle_registration, vehicle_stock_number, drive_date, drive_time,
                duration_minutes, status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dealer_id)
        .bind(fields.customer_name)
        .bind(fields.customer_email)
        .bind(fields.customer_phone)
        .bind(fields.vehicle_make)
        .bind(fields.vehicle_model)
        .bind(fields.vehicle_registration)
        .bind(fields.vehicle_stock_number)
        .bind(fields.drive_date)
        .bind(fields.drive_time)
        .bind(fields.duration_minutes)
        .bind(fields.status.as_str())
        .bind(fields.notes)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(entry)
    }

    async fn update_test_drive(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: TestDriveFields,
    ) -> AppResult<Option<TestDriveEntry>> {
        let entry = sqlx::query_as::<_, TestDriveEntry>(
            r#"
            UPDATE test_drive_entries
            SET customer_name = $3, customer_email = $4, customer_phone = $5, vehicle_make = $6,
                vehicle_model = $7, vehicle_registration = $8, vehicle_stock_number = $9,
                drive_date = $10, drive_time = $11, duration_minutes = $12, status = $13,
                notes = $14, updated_at = $15
            WHERE id = $1 AND dealer_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dealer_id)
        .bind(fields.customer_name)
        .bind(fields.customer_email)
        .bind(fields.customer_phone)
        .bind(fields.vehicle_make)
        .bind(fields.vehicle_model)
        .bind(fields.vehicle_registration)
        .bind(fields.vehicle_stock_number)
        .bind(fields.drive_date)
        .bind(fields.drive_time)
        .bind(fields.duration_minutes)
        .bind(fields.status.as_str())
        .bind(fields.notes)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?;

        Ok(entry)
    }
}
