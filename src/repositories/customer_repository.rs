use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{map_unique_violation, postgres::PgStore};
use crate::models::customer::{Customer, CustomerFields, CustomerQuery};
use crate::models::dealer::DealerId;
use crate::utils::errors::AppResult;
use crate::utils::validation::like_pattern;

pub(crate) const DUPLICATE_EMAIL: &str = "A customer with this email already exists";

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_customers(&self, dealer_id: DealerId, query: &CustomerQuery) -> AppResult<Vec<Customer>>;

    async fn find_customer(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<Customer>>;

    async fn create_customer(&self, dealer_id: DealerId, fields: CustomerFields) -> AppResult<Customer>;

    /// `None` si el cliente no existe para este concesionario
    async fn update_customer(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: CustomerFields,
    ) -> AppResult<Option<Customer>>;
}

#[async_trait]
impl CustomerRepository for PgStore {
    async fn list_customers(&self, dealer_id: DealerId, query: &CustomerQuery) -> AppResult<Vec<Customer>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM customers WHERE dealer_id = ");
        builder.push_bind(dealer_id);

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            builder
                .push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR (first_name || ' ' || last_name) ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        // Columna y dirección salen de enums cerrados, nunca del texto de la petición
        builder.push(format!(
            " ORDER BY {} {}, id ASC",
            query.sort.sql_expression(),
            query.order.as_sql()
        ));
        builder
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let customers = builder
            .build_query_as::<Customer>()
            .fetch_all(self.pool())
            .await?;

        Ok(customers)
    }

    async fn find_customer(&self, dealer_id: DealerId, id: Uuid) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 AND dealer_id = $2")
            .bind(id)
            .bind(dealer_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(customer)
    }

    async fn create_customer(&self, dealer_id: DealerId, fields: CustomerFields) -> AppResult<Customer> {
        let now = Utc::now();
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                id, dealer_id, first_name, last_name, email, phone, address_line, city, postcode,
                status, marketing_consent, sales_consent, gdpr_consent, consent_date,
                tags, custom_fields, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dealer_id)
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address_line)
        .bind(fields.city)
        .bind(fields.postcode)
        .bind(fields.status.as_str())
        .bind(fields.marketing_consent)
        .bind(fields.sales_consent)
        .bind(fields.gdpr_consent)
        .bind(fields.consent_date)
        .bind(Json(fields.tags))
        .bind(Json(fields.custom_fields))
        .bind(fields.notes)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))
    }

    async fn update_customer(
        &self,
        dealer_id: DealerId,
        id: Uuid,
        fields: CustomerFields,
    ) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET first_name = $3, last_name = $4, email = $5, phone = $6, address_line = $7,
                city = $8, postcode = $9, status = $10, marketing_consent = $11,
                sales_consent = $12, gdpr_consent = $13, consent_date = $14, tags = $15,
                custom_fields = $16, notes = $17, updated_at = $18
            WHERE id = $1 AND dealer_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dealer_id)
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address_line)
        .bind(fields.city)
        .bind(fields.postcode)
        .bind(fields.status.as_str())
        .bind(fields.marketing_consent)
        .bind(fields.sales_consent)
        .bind(fields.gdpr_consent)
        .bind(fields.consent_date)
        .bind(Json(fields.tags))
        .bind(Json(fields.custom_fields))
        .bind(fields.notes)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))
    }
}
