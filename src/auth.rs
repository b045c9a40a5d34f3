use axum::extract::State;
use axum::http::HeaderMap;
use axum::middleware;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ApiError;
use crate::handlers::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Subject of the validated bearer token, stored in request extensions by the
/// middleware so handlers can compare it against the ids they act on.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

pub fn create_token(user_id: &str, jwt_secret: &str) -> Result<String, Box<dyn std::error::Error>> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)?
        .as_secs() as usize
        + 24 * 60 * 60; // 24 hours
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<String, Box<dyn std::error::Error>> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims.sub)
}

/// Rejects requests without a valid bearer token and records the token
/// subject for the downstream handler.
pub async fn authenticate(
    headers: HeaderMap,
    State(state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> Result<axum::response::Response, ApiError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| ApiError::new(
            "unauthorized",
            "missing Authorization header",
            axum::http::StatusCode::UNAUTHORIZED,
        ))?;
    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::new(
            "unauthorized",
            "invalid Authorization header format",
            axum::http::StatusCode::UNAUTHORIZED,
        ))?;
    let user_id = validate_token(token, &state.config.jwt_secret).map_err(|_| {
        ApiError::new(
            "unauthorized",
            "invalid or expired token",
            axum::http::StatusCode::UNAUTHORIZED,
        )
    })?;
    log::debug!("authenticated user: {}", user_id);
    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_subject() {
        let token = create_token("user-123", "secret").unwrap();
        let subject = validate_token(&token, "secret").unwrap();
        assert_eq!(subject, "user-123");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = create_token("user-123", "secret").unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not-a-token", "secret").is_err());
    }
}
