use crate::state::AppState;
use axum::Router;

pub mod auth;
pub mod product;
pub mod utility;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(utility::router())
        .merge(auth::router())
        .merge(product::router())
}
