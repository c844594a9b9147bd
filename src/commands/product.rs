use axum::extract::{Json, Path, State};

use crate::error::{DepoError, DepoResult};
use crate::state::AppState;
use crate::store::{NewProduct, Product, ProductPatch};

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> DepoResult<Json<Product>> {
    check_non_negative("quantity", payload.quantity)?;
    check_non_negative("min_quantity", payload.min_quantity)?;
    check_price("purchase_price", payload.purchase_price)?;
    check_price("sale_price", payload.sale_price)?;

    let product = state.store.create_product(payload)?;
    tracing::info!("Created product '{}' ({})", product.name, product.id);

    Ok(Json(product))
}

pub async fn get_product_list(State(state): State<AppState>) -> DepoResult<Json<Vec<Product>>> {
    let products = state.store.list_products()?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DepoResult<Json<Product>> {
    let product = state
        .store
        .get_product(&id)?
        .ok_or_else(|| DepoError::NotFound(format!("product '{}' not found", id)))?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPatch>,
) -> DepoResult<Json<Product>> {
    if let Some(quantity) = payload.quantity {
        check_non_negative("quantity", quantity)?;
    }
    if let Some(min_quantity) = payload.min_quantity {
        check_non_negative("min_quantity", min_quantity)?;
    }
    if let Some(purchase_price) = payload.purchase_price {
        check_price("purchase_price", purchase_price)?;
    }
    if let Some(sale_price) = payload.sale_price {
        check_price("sale_price", sale_price)?;
    }

    let product = state.store.update_product(&id, payload)?;
    tracing::info!("Updated product '{}' ({})", product.name, product.id);

    Ok(Json(product))
}

fn check_non_negative(field: &str, value: i32) -> DepoResult<()> {
    if value < 0 {
        return Err(DepoError::Validation(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}

fn check_price(field: &str, value: f64) -> DepoResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DepoError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}
