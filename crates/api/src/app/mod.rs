//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (stores, gateway, services)
//! - `routes/`: HTTP routes + handlers (one file per surface area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(admin_email: String, seed_demo: bool) -> Router {
    let services = Arc::new(services::build_in_memory_services(&admin_email, seed_demo).await);
    let session_state = middleware::SessionState {
        identity: services.identity.clone(),
    };

    // Gated routes: anonymous requests are turned away at the door.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            session_state.clone(),
            middleware::require_session_middleware,
        ));

    // Public storefront: the session is resolved when a token is present so
    // handlers can still see who is browsing, but nothing is required.
    let public = routes::public_router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            session_state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const ADMIN_EMAIL: &str = "admin@example.com";

    async fn app() -> Router {
        build_app(ADMIN_EMAIL.to_string(), true).await
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": email })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    async fn first_product(app: &Router) -> (String, u64) {
        let (status, body) = send(app, Method::GET, "/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let item = &body["items"][0];
        (
            item["id"].as_str().unwrap().to_string(),
            item["price_cents"].as_u64().unwrap(),
        )
    }

    fn checkout_body() -> Value {
        json!({
            "shipping_address": {
                "street": "123 Baby St",
                "city": "New York",
                "region": "NY",
                "postal_code": "10001",
                "country": "US",
            }
        })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app().await;
        let (status, _) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn the_catalog_is_public_and_filterable() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 5);

        let (status, body) =
            send(&app, Method::GET, "/products?category=soap", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let (status, body) =
            send(&app, Method::GET, "/products?featured=true", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 3);

        let (status, body) =
            send(&app, Method::GET, "/products?category=bogus", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_category");
    }

    #[tokio::test]
    async fn the_cart_is_gated_with_a_sign_in_redirect() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/cart", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");
        assert_eq!(body["redirect"], "/auth");

        let (status, body) =
            send(&app, Method::POST, "/checkout", None, Some(checkout_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["redirect"], "/auth");
    }

    #[tokio::test]
    async fn the_cart_flow_reaches_a_placed_order() {
        let app = app().await;
        let token = sign_up(&app, "shopper@example.com").await;
        let (product_id, price) = first_product(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/cart/items",
            Some(&token),
            Some(json!({ "product_id": product_id, "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"].as_array().unwrap().len(), 1);
        assert_eq!(body["total_cents"].as_u64().unwrap(), 2 * price);

        let (status, body) = send(
            &app,
            Method::POST,
            "/checkout",
            Some(&token),
            Some(checkout_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let order_id = body["order_id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/orders", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], order_id.as_str());
        assert_eq!(items[0]["status"], "pending");
        assert_eq!(items[0]["payment_status"], "completed");
        assert_eq!(items[0]["total_cents"].as_u64().unwrap(), 2 * price);

        let (status, body) = send(&app, Method::GET, "/cart", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["lines"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn adding_an_item_without_a_quantity_adds_one() {
        let app = app().await;
        let token = sign_up(&app, "shopper@example.com").await;
        let (product_id, price) = first_product(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/cart/items",
            Some(&token),
            Some(json!({ "product_id": product_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let lines = body["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["quantity"].as_u64().unwrap(), 1);
        assert_eq!(body["total_cents"].as_u64().unwrap(), price);
    }

    #[tokio::test]
    async fn checking_out_an_empty_cart_redirects_back_to_the_cart() {
        let app = app().await;
        let token = sign_up(&app, "shopper@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/checkout",
            Some(&token),
            Some(checkout_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "empty_cart");
        assert_eq!(body["redirect"], "/cart");
    }

    #[tokio::test]
    async fn the_admin_surface_is_gated_by_role() {
        let app = app().await;
        let customer = sign_up(&app, "shopper@example.com").await;
        let admin = sign_up(&app, ADMIN_EMAIL).await;

        let create = json!({
            "name": "Lavender Soap Bar",
            "category": "soap",
            "price_cents": 700,
        });

        let (status, body) = send(
            &app,
            Method::POST,
            "/admin/products",
            Some(&customer),
            Some(create.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");

        let (status, body) = send(
            &app,
            Method::POST,
            "/admin/products",
            Some(&admin),
            Some(create),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/admin/products/{id}"),
            Some(&admin),
            Some(json!({ "price_cents": 750 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price_cents"].as_u64().unwrap(), 750);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/admin/products/{id}"),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) =
            send(&app, Method::GET, &format!("/products/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_order_listing_filters_and_rejects_customers() {
        let app = app().await;
        let customer = sign_up(&app, "shopper@example.com").await;
        let admin = sign_up(&app, ADMIN_EMAIL).await;

        let (status, _) = send(&app, Method::GET, "/admin/orders", Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::GET,
            "/admin/orders?status=bogus",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_status");

        let (status, body) = send(
            &app,
            Method::GET,
            "/admin/orders?status=pending",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signing_out_revokes_the_token() {
        let app = app().await;
        let token = sign_up(&app, "shopper@example.com").await;

        let (status, _) = send(&app, Method::GET, "/cart", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::POST, "/auth/signout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/cart", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_the_service() {
        let app = app().await;
        let token = sign_up(&app, "shopper@example.com").await;

        let (status, body) =
            send(&app, Method::GET, "/products/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_id");

        let (status, body) = send(
            &app,
            Method::POST,
            "/cart/items",
            Some(&token),
            Some(json!({ "product_id": "not-a-uuid", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_id");
    }
}
