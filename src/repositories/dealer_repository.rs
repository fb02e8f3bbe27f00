use async_trait::async_trait;
use chrono::Utc;

use super::postgres::PgStore;
use crate::models::dealer::{Dealer, DealerId, DealerProfile, NewDealer};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait DealerRepository: Send + Sync {
    /// Busca el concesionario asociado a un usuario del proveedor de identidad
    async fn find_dealer_by_external_id(&self, external_user_id: &str) -> AppResult<Option<Dealer>>;

    /// Crea el concesionario si no existe. Devuelve `true` si se ha creado.
    async fn create_dealer_if_absent(&self, dealer: NewDealer) -> AppResult<(Dealer, bool)>;

    async fn update_dealer_profile(&self, dealer_id: DealerId, profile: DealerProfile) -> AppResult<Dealer>;
}

#[async_trait]
impl DealerRepository for PgStore {
    async fn find_dealer_by_external_id(&self, external_user_id: &str) -> AppResult<Option<Dealer>> {
        let dealer = sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE external_user_id = $1")
            .bind(external_user_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(dealer)
    }

    async fn create_dealer_if_absent(&self, dealer: NewDealer) -> AppResult<(Dealer, bool)> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers (id, external_user_id, business_name, contact_email, phone, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (external_user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(DealerId::new())
        .bind(&dealer.external_user_id)
        .bind(&dealer.profile.business_name)
        .bind(&dealer.profile.contact_email)
        .bind(&dealer.profile.phone)
        .bind(&dealer.profile.address)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        if let Some(created) = created {
            return Ok((created, true));
        }

        let existing = self
            .find_dealer_by_external_id(&dealer.external_user_id)
            .await?
            .ok_or_else(|| AppError::Internal("dealer vanished after insert conflict".to_string()))?;

        Ok((existing, false))
    }

    async fn update_dealer_profile(&self, dealer_id: DealerId, profile: DealerProfile) -> AppResult<Dealer> {
        let dealer = sqlx::query_as::<_, Dealer>(
            r#"
            UPDATE dealers
            SET business_name = $2, contact_email = $3, phone = $4, address = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(dealer_id)
        .bind(profile.business_name)
        .bind(profile.contact_email)
        .bind(profile.phone)
        .bind(profile.address)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("Dealer profile not found".to_string()))?;

        Ok(dealer)
    }
}
