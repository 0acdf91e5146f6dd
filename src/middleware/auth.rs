use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;
use crate::error::ApiError;

/// Caller identity extracted from the identity provider's JWT.
///
/// This is the ambient "who is calling" context; it says nothing about
/// whether a profile has been provisioned for the caller.
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            external_id: claims.sub,
            name: claims.name,
            email: claims.email,
            avatar_url: claims.avatar_url,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts the caller identity
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthenticated)?;

    // Validate and decode JWT
    let claims = validate_jwt(&token).map_err(ApiError::unauthenticated)?;

    // Convert claims to CallerIdentity and inject into request
    let caller = CallerIdentity::from(claims);
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
