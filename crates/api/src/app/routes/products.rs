use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use cradle_catalog::Category;
use cradle_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    let result = match (&query.category, query.featured) {
        (Some(raw), _) => {
            let category: Category = match raw.parse() {
                Ok(c) => c,
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_category",
                        "category must be one of: soap, baby_lotion, adult_lotion",
                    )
                }
            };
            services.catalog.list_by_category(category).await
        }
        (None, Some(true)) => services.catalog.featured().await,
        _ => services.catalog.list().await,
    };

    match result {
        Ok(items) => {
            let items = items.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.catalog.get(id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}
