use std::sync::Arc;

use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::dealer_dto::DealerProfileRequest;
use crate::models::dealer::{Dealer, NewDealer};
use crate::repositories::{DealerScope, Store};
use crate::services::identity_service::Identity;
use crate::utils::errors::AppError;

/// Alta del concesionario: solo pasa por el middleware de identidad
pub struct OnboardingController {
    store: Arc<dyn Store>,
}

impl OnboardingController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Crea el concesionario de la identidad si no existe. Devuelve `true` si se ha creado.
    pub async fn onboard(
        &self,
        identity: &Identity,
        request: DealerProfileRequest,
    ) -> Result<(ApiResponse<Dealer>, bool), AppError> {
        let mut request = request.normalized();
        if request.contact_email.is_none() {
            request.contact_email = identity.email.clone();
        }
        request.validate()?;

        let (dealer, created) = self
            .store
            .create_dealer_if_absent(NewDealer {
                external_user_id: identity.external_user_id.clone(),
                profile: request.into_profile(),
            })
            .await?;

        if created {
            tracing::info!("✅ Concesionario {} dado de alta ({})", dealer.id, dealer.business_name);
            Ok((ApiResponse::success_with_message(dealer, "Dealer profile created"), true))
        } else {
            Ok((ApiResponse::success_with_message(dealer, "Dealer profile already exists"), false))
        }
    }
}

pub struct DealerController {
    scope: DealerScope,
}

impl DealerController {
    pub fn new(scope: DealerScope) -> Self {
        Self { scope }
    }

    pub fn get_profile(&self) -> ApiResponse<Dealer> {
        ApiResponse::success(self.scope.dealer().clone())
    }

    pub async fn update_profile(&self, request: DealerProfileRequest) -> Result<ApiResponse<Dealer>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let dealer = self.scope.update_profile(request.into_profile()).await?;
        Ok(ApiResponse::success_with_message(dealer, "Dealer profile updated"))
    }
}
