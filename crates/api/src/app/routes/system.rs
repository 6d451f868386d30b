use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The signed-in identity, as the UI's account header sees it.
pub async fn me(Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    match ctx.session().current_user() {
        Some(user) => Json(dto::user_to_json(user)),
        None => Json(serde_json::json!({ "anonymous": true })),
    }
}
