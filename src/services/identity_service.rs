//! Verificación de tokens del proveedor de identidad
//!
//! Este módulo valida los JWT emitidos por el proveedor de identidad externo
//! (HS256 con secreto compartido o RS256 con clave pública) y extrae la
//! identidad del usuario. La API nunca emite tokens propios.

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{IdentityConfig, IdentityKey};
use crate::utils::errors::AppError;

/// Claims que la API lee del token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Identidad verificada que se inyecta en las requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub external_user_id: String,
    pub email: Option<String>,
}

/// Verificador de tokens construido a partir de la configuración
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn from_config(config: &IdentityConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let (decoding_key, algorithm) = match &config.key {
            IdentityKey::SharedSecret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            IdentityKey::RsaPublicKeyPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.validate_aud = true;
            }
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Valida firma, expiración, emisor y audiencia, y devuelve la identidad
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Token rechazado: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        let sub = data.claims.sub.trim();
        if sub.is_empty() {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }

        Ok(Identity {
            external_user_id: sub.to_string(),
            email: data.claims.email,
        })
    }
}
