//! Authentication middleware.
//!
//! Validates `Authorization: Bearer <jwt>` tokens asserted by the identity
//! provider and exposes the authenticated profile to handlers as a request
//! extension. This service never issues tokens itself.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::api::SharedState;
use crate::models::user::UserProfile;

/// JWT claims asserted by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    /// Administrator role flag
    #[serde(default)]
    pub admin: bool,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Extension that holds authenticated user information
#[derive(Debug, Clone)]
pub struct AuthExtension {
    pub profile: UserProfile,
    pub is_admin: bool,
}

impl From<Claims> for AuthExtension {
    fn from(claims: Claims) -> Self {
        Self {
            profile: UserProfile {
                id: claims.sub,
                email: claims.email,
                first_name: claims.given_name,
                family_name: claims.family_name,
            },
            is_admin: claims.admin,
        }
    }
}

/// Authentication middleware function - requires a valid bearer token
pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => {
            let key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
            match decode::<Claims>(token, &key, &Validation::default()) {
                Ok(data) => {
                    request
                        .extensions_mut()
                        .insert(AuthExtension::from(data.claims));
                    next.run(request).await
                }
                Err(_) => (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response(),
            }
        }
        None => (StatusCode::UNAUTHORIZED, "Missing bearer token").into_response(),
    }
}

/// Administrator guard, applied after [`auth_middleware`]
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthExtension>() {
        Some(auth) if auth.is_admin => next.run(request).await,
        Some(_) => (StatusCode::FORBIDDEN, "Administrator role required").into_response(),
        None => (StatusCode::UNAUTHORIZED, "Missing bearer token").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn claims_round_trip_through_token() {
        let claims = Claims {
            sub: "alice".into(),
            email: "a@x.com".into(),
            given_name: "Alice".into(),
            family_name: "Adams".into(),
            admin: false,
            exp: 4_102_444_800, // far future
        };
        let secret = b"test-secret";
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret),
            &Validation::default(),
        )
        .unwrap();

        let auth = AuthExtension::from(decoded.claims);
        assert_eq!(auth.profile.id, "alice");
        assert_eq!(auth.profile.full_name(), "Alice Adams");
        assert!(!auth.is_admin);
    }
}
