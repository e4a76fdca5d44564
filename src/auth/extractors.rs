use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::warn;
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Extracts and validates the bearer JWT, returning the user ID.
pub struct AuthUser(pub Uuid);

pub(crate) fn verify_token(cfg: &JwtConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    if let Some(issuer) = &cfg.issuer {
        validation.set_issuer(std::slice::from_ref(issuer));
    }
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());
    Ok(decode::<Claims>(token, &decoding, &validation)?.claims)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cfg = state
            .config
            .jwt
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("Authentication is not configured".into()))?;

        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = verify_token(cfg, token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}
