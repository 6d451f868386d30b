//! `cradle-infra` — collaborator traits, in-memory adapters, and the
//! application services that compose gate + store + domain.
//!
//! The domain crates stay pure; everything that suspends (row store,
//! payment authorization, session lookup) lives behind the traits defined
//! here, so services can be exercised end-to-end against the in-memory
//! adapters.

pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod error;
pub mod identity_service;
pub mod order_service;
pub mod payment;
pub mod store;

pub use cart_service::{CartGuard, CartLineView, CartService, CartSnapshot};
pub use catalog_service::CatalogService;
pub use checkout_service::CheckoutService;
pub use error::{ServiceError, ServiceResult};
pub use identity_service::IdentityService;
pub use order_service::OrderService;
pub use payment::{PaymentAuthorization, PaymentError, PaymentGateway, ScriptedGateway};
pub use store::{
    CartStore, InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore,
    InMemorySessionStore, InMemoryUserDirectory, JoinedCartLine, OrderStore, ProductStore,
    SessionStore, StoreError, StoreResult, UserDirectory,
};

#[cfg(test)]
mod integration_tests;
