use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use cradle_core::{CartLineId, ProductId};
use cradle_infra::cart_service::CartSnapshot;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:line_id", put(set_quantity).delete(remove_line))
}

fn snapshot_response(snapshot: CartSnapshot) -> axum::response::Response {
    (StatusCode::OK, Json(dto::cart_to_json(&snapshot))).into_response()
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> axum::response::Response {
    match services.cart.snapshot(ctx.session()).await {
        Ok(snapshot) => snapshot_response(snapshot),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<dto::AddItemRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services
        .cart
        .add_item(ctx.session(), product_id, body.quantity)
        .await
    {
        Ok(snapshot) => snapshot_response(snapshot),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(line_id): Path<String>,
    Json(body): Json<dto::SetQuantityRequest>,
) -> axum::response::Response {
    let line_id: CartLineId = match line_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid line id")
        }
    };

    match services
        .cart
        .set_quantity(ctx.session(), line_id, body.quantity)
        .await
    {
        Ok(snapshot) => snapshot_response(snapshot),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn remove_line(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(line_id): Path<String>,
) -> axum::response::Response {
    let line_id: CartLineId = match line_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid line id")
        }
    };

    match services.cart.remove_line(ctx.session(), line_id).await {
        Ok(snapshot) => snapshot_response(snapshot),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> axum::response::Response {
    match services.cart.clear(ctx.session()).await {
        Ok(snapshot) => snapshot_response(snapshot),
        Err(err) => errors::service_error_to_response(err),
    }
}
