use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use cradle_auth::SessionToken;
use cradle_infra::identity_service::IdentityService;

use crate::app::errors;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct SessionState {
    pub identity: Arc<IdentityService>,
}

/// Resolve the bearer token into a session and inject it as a request
/// extension. Missing, malformed or revoked tokens resolve to an anonymous
/// session; handlers behind the authenticated router reject those with a
/// sign-in redirect.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers());

    let session = match state.identity.session_for(token).await {
        Ok(session) => session,
        Err(err) => return errors::service_error_to_response(err),
    };

    req.extensions_mut()
        .insert(SessionContext::new(session, token));

    next.run(req).await
}

/// Like [`session_middleware`], then reject anonymous sessions outright so
/// nothing behind the authenticated router runs without an identity.
pub async fn require_session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers());

    let session = match state.identity.session_for(token).await {
        Ok(session) => session,
        Err(err) => return errors::service_error_to_response(err),
    };

    if session.current_user().is_none() {
        return errors::json_error_with_redirect(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "sign in required",
            "/auth",
        );
    }

    req.extensions_mut()
        .insert(SessionContext::new(session, token));

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    // An unparseable token is indistinguishable from an expired one.
    token.parse().ok()
}
