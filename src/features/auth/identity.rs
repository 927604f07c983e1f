use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;
use super::model::IdentityProfile;
use crate::core::error::{AppError, Result};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Turns a sign-in credential into a verified identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<IdentityProfile>;
}

/// Claims of a Google Identity Services ID token
#[derive(Debug, Clone, Deserialize)]
struct GoogleClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl TryFrom<GoogleClaims> for IdentityProfile {
    type Error = AppError;

    fn try_from(claims: GoogleClaims) -> Result<Self> {
        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::Auth("ID token carries no email".to_string()))?;

        if claims.email_verified == Some(false) {
            return Err(AppError::Auth("Email address is not verified".to_string()));
        }

        Ok(IdentityProfile {
            name: claims.name.unwrap_or_else(|| email.clone()),
            subject: claims.sub,
            email,
            picture: claims.picture,
        })
    }
}

/// Verifies Google ID tokens (RS256) against Google's published keys
pub struct GoogleIdentityProvider {
    jwks_client: Arc<JwksClient>,
    client_id: String,
    leeway: u64,
}

impl GoogleIdentityProvider {
    pub fn new(jwks_client: Arc<JwksClient>, client_id: String, leeway: Duration) -> Self {
        Self {
            jwks_client,
            client_id,
            leeway: leeway.as_secs(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<IdentityProfile> {
        let header = decode_header(credential).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_audience(&[&self.client_id]);
        validation.leeway = self.leeway;

        let token_data = decode::<GoogleClaims>(credential, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        token_data.claims.try_into()
    }
}
