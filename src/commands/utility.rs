use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> &'static str {
    "Depo API is running!"
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
