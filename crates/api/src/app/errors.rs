use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cradle_infra::error::ServiceError;
use cradle_infra::store::StoreError;

/// Map a service error onto a status code, a stable machine-readable code
/// and, where the UI has a better page to be on, a redirect hint.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Unauthenticated => json_error_with_redirect(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "sign in required",
            "/auth",
        ),
        ServiceError::Forbidden => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "admin access required")
        }
        ServiceError::EmptyCart => json_error_with_redirect(
            StatusCode::CONFLICT,
            "empty_cart",
            "cart is empty",
            "/cart",
        ),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ServiceError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        ServiceError::Invariant(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        // Both payment outcomes leave the cart intact; the codes differ so
        // the UI can distinguish "try another card" from "you backed out".
        ServiceError::PaymentDeclined(reason) => {
            json_error(StatusCode::PAYMENT_REQUIRED, "payment_declined", reason)
        }
        ServiceError::PaymentCancelled => json_error(
            StatusCode::PAYMENT_REQUIRED,
            "payment_cancelled",
            "payment was cancelled",
        ),
        ServiceError::Store(StoreError::Unavailable(msg)) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
        ServiceError::Store(StoreError::Decode(msg)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "decode_error", msg)
        }
        ServiceError::Store(StoreError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_order_status(s: &str) -> Result<cradle_orders::OrderStatus, axum::response::Response> {
    use cradle_orders::OrderStatus;
    match s.to_lowercase().as_str() {
        "pending" => Ok(OrderStatus::Pending),
        "processing" => Ok(OrderStatus::Processing),
        "shipped" => Ok(OrderStatus::Shipped),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: pending, processing, shipped, delivered, cancelled",
        )),
    }
}

pub fn json_error_with_redirect(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    redirect: &'static str,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "redirect": redirect,
        })),
    )
        .into_response()
}
