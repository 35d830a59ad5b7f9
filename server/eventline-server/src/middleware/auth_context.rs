//! Authentication context extraction
//!
//! Extracts the authenticated principal from the Bearer token on each
//! protected endpoint. Tokens are issued by the external identity provider;
//! this server only verifies the signature and reads the claims.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use ticketing_core::{Principal, Role};

use crate::error::ApiError;
use crate::server::EventlineServer;

/// JWT verification configuration
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Load the signing secret from the environment
    ///
    /// # Errors
    ///
    /// Fails when `JWT_SECRET` is not set.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        Ok(Self { secret })
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// JWT claims carried by identity provider tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Role name: customer, organizer, or admin
    pub role: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Authentication context extracted from the JWT token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub name: Option<String>,
}

impl AuthContext {
    /// The domain-level principal for this request
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id,
            role: self.role,
            name: self.name.clone(),
        }
    }
}

fn extract_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::authentication("Missing Authorization header"))?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::authentication("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

#[async_trait]
impl FromRequestParts<EventlineServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &EventlineServer,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &state.auth.decoding_key(), &validation)
            .map_err(|e| ApiError::authentication(format!("Invalid token: {e}")))?;

        let claims = token_data.claims;
        let role = Role::from_str(&claims.role)
            .map_err(|_| ApiError::authentication(format!("Unknown role: {}", claims.role)))?;

        Ok(AuthContext {
            user_id: claims.sub,
            role,
            name: claims.name,
        })
    }
}
