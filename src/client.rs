use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};

use crate::auth::gate::require_user;
use crate::state::AppState;

/// Client area; every route in here requires the USER role.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
        .route_layer(middleware::from_fn(require_user))
}

async fn dashboard() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Client Dashboard",
        "role": "CLIENT",
    }))
}

async fn profile() -> Json<Value> {
    Json(json!({
        "message": "Client profile page",
    }))
}
