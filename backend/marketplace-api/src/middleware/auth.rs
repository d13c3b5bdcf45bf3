use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Claims of the bearer token issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: usize,
    pub iat: usize,
}

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Verifies the bearer token, if any, and stores the caller in the request
/// extensions. A missing or invalid token leaves the request anonymous;
/// extractors and the access guard decide what anonymous means.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match verify_token(&state.config.jwt.secret, token) {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    next.run(request).await
}

pub fn verify_token(secret: &str, token: &str) -> anyhow::Result<CurrentUser> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;

    Ok(CurrentUser {
        id: claims.sub.parse()?,
    })
}

/// Signs a session token. The auth provider owns issuance in production;
/// this exists for tooling and tests that share the secret.
pub fn issue_token(secret: &str, user_id: Uuid, ttl: Duration) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_token_verifies() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, Duration::hours(1)).unwrap();

        assert_eq!(verify_token(SECRET, &token).unwrap(), CurrentUser { id: user_id });
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::hours(1)).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::hours(-2)).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
