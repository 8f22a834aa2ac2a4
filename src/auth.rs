use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{error::AppError, state::AppState};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    /// Expiration time (as Unix timestamp)
    pub exp: u64,
    /// Issued at (as Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Create new claims with given subject and expiration duration in seconds
    pub fn new(subject: String, expires_in_secs: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs();

        Self {
            sub: subject,
            iat: now,
            exp: now + expires_in_secs,
        }
    }
}

/// Verify a JWT token using ES256 algorithm
pub fn verify_token(
    token: &str,
    public_key_pem: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_ec_pem(public_key_pem.as_bytes())?;
    let mut validation = Validation::new(Algorithm::ES256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

/// Caller identity attached to every request by [`attach_auth_context`].
/// `claims` is `None` for anonymous or unverifiable callers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Option<Claims>,
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Attaches an [`AuthContext`] to the request and moves on. Never rejects;
/// route-level guards decide what anonymity means for them.
pub async fn attach_auth_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = state.auth.as_ref().and_then(|auth| {
        bearer_token(&request).and_then(|token| verify_token(token, &auth.public_key).ok())
    });

    request.extensions_mut().insert(AuthContext { claims });
    next.run(request).await
}

fn not_signed_in() -> Response {
    AppError::Unauthorized("you must be logged in".to_string()).into_response()
}

/// Guard for routes that require a signed-in caller.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(|ctx| ctx.claims.is_some());

    if !authenticated {
        return not_signed_in();
    }
    next.run(request).await
}

/// Guard for admin-only routes. Admin identity is the configured token
/// subject; anything else gets a 403, anonymity a 401.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let claims = request
        .extensions()
        .get::<AuthContext>()
        .and_then(|ctx| ctx.claims.clone());

    let Some(claims) = claims else {
        return not_signed_in();
    };

    let is_admin = state
        .auth
        .as_ref()
        .and_then(|auth| auth.admin_subject.as_deref())
        .is_some_and(|admin| admin == claims.sub);

    if !is_admin {
        return AppError::Forbidden("you must be an admin".to_string()).into_response();
    }
    next.run(request).await
}
