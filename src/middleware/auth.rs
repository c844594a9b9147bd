use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{DepoError, DepoResult};
use crate::store::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

pub fn get_jwt_secret() -> Vec<u8> {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure default!");
            "insecure-development-secret-key-replace-me-immediately".to_string()
        })
        .into_bytes()
}

/// Signs a bearer token for the given user, valid for 24 hours.
pub fn issue_token(user: &User) -> DepoResult<String> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role.clone(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&get_jwt_secret()),
    )
    .map_err(|e| DepoError::Internal(format!("Token signing failed: {}", e)))
}

pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, DepoError> {
    let path = request.uri().path();
    let public_routes = vec!["/api/auth/login", "/api/ping"];

    if !path.starts_with("/api/") || public_routes.contains(&path) {
        return Ok(next.run(request).await);
    }

    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| DepoError::Auth("invalid authorization header".to_string()))?,
        None => {
            return Err(DepoError::Auth("missing bearer token".to_string()));
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return Err(DepoError::Auth("missing bearer token".to_string()));
    }

    let token = &auth_header["Bearer ".len()..];

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&get_jwt_secret()),
        &Validation::default(),
    )
    .map_err(|_| DepoError::Auth("invalid bearer token".to_string()))?;

    request.extensions_mut().insert(token_data.claims);

    Ok(next.run(request).await)
}
