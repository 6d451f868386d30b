use axum::{
    routing::{get, post},
    Router,
};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod system;

/// Router for everything behind the session gate.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .route("/auth/signout", post(auth::sign_out))
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}

/// Router for the public storefront surface.
pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
}
