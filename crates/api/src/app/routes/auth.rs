use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignUpRequest>,
) -> axum::response::Response {
    match services
        .identity
        .sign_up(&body.email, body.name, Utc::now())
        .await
    {
        Ok((user, token)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "user": dto::user_to_json(&user),
                "token": token.to_string(),
            })),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    match services.identity.sign_in(&body.email).await {
        Ok((user, token)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "user": dto::user_to_json(&user),
                "token": token.to_string(),
            })),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

/// Revoke the token this request authenticated with.
pub async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> axum::response::Response {
    let Some(token) = ctx.token() else {
        // Behind the session gate a token is always present; treat the
        // impossible case as already signed out.
        return StatusCode::NO_CONTENT.into_response();
    };

    match services.identity.sign_out(token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}
