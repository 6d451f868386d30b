use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use cradle_orders::ShippingAddress;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new().route("/", post(submit_order))
}

pub async fn submit_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    let address = body.shipping_address;
    let shipping_address = match ShippingAddress::new(
        address.street,
        address.city,
        address.region,
        address.postal_code,
        address.country,
    ) {
        Ok(v) => v,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services
        .checkout
        .submit_order(ctx.session(), shipping_address, Utc::now())
        .await
    {
        Ok(order_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "order_id": order_id.to_string() })),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}
