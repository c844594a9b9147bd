use axum::extract::{Extension, Json, State};
use bcrypt::verify;
use serde::{Deserialize, Serialize};

use crate::error::{DepoError, DepoResult};
use crate::middleware::auth::{issue_token, Claims};
use crate::state::AppState;
use crate::store::User;

// Single message for every credential failure so the response never reveals
// whether the username or the password was wrong.
const BAD_CREDENTIALS: &str = "invalid username or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> DepoResult<Json<TokenResponse>> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(DepoError::Auth(BAD_CREDENTIALS.to_string()));
    }

    let user = match state.store.find_user_by_username(&payload.username)? {
        Some(user) => user,
        None => return Err(DepoError::Auth(BAD_CREDENTIALS.to_string())),
    };

    match verify(&payload.password, &user.password) {
        Ok(true) => {}
        _ => return Err(DepoError::Auth(BAD_CREDENTIALS.to_string())),
    }

    let access_token = issue_token(&user)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DepoResult<Json<User>> {
    let user = state
        .store
        .find_user_by_id(&claims.sub)?
        .ok_or_else(|| DepoError::NotFound("user not found".to_string()))?;

    Ok(Json(user))
}
