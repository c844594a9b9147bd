use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(commands::product::get_product_list).post(commands::product::create_product),
        )
        .route(
            "/api/products/:id",
            get(commands::product::get_product).put(commands::product::update_product),
        )
}
