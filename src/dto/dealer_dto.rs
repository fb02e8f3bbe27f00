use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::dealer::DealerProfile;
use crate::utils::validation::trim_optional;

// Request para dar de alta o actualizar el perfil del concesionario
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DealerProfileRequest {
    #[validate(length(min = 1, max = 200), custom = "crate::utils::validation::validate_not_blank")]
    pub business_name: String,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(regex = "crate::utils::validation::PHONE_REGEX")]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,
}

impl DealerProfileRequest {
    /// Recorta espacios y convierte los opcionales vacíos en `None`
    pub fn normalized(self) -> Self {
        Self {
            business_name: self.business_name.trim().to_string(),
            contact_email: trim_optional(self.contact_email),
            phone: trim_optional(self.phone),
            address: trim_optional(self.address),
        }
    }

    pub fn into_profile(self) -> DealerProfile {
        DealerProfile {
            business_name: self.business_name,
            contact_email: self.contact_email,
            phone: self.phone,
            address: self.address,
        }
    }
}
