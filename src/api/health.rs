use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let authenticated = state.session.lock().await.is_active();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": authenticated,
    }))
}
