//! Persistence collaborator: an opaque row store consumed through a handful
//! of verbs, strongly consistent per owning identity (a read immediately
//! following that identity's own write reflects it).
//!
//! The in-memory adapters keep rows as JSON documents and decode them
//! through the explicit schemas in [`rows`], so a malformed row surfaces as
//! [`StoreError::Decode`] at the boundary instead of leaking dynamic shapes
//! into the domain.

pub mod in_memory;
pub mod rows;

use async_trait::async_trait;
use thiserror::Error;

use cradle_auth::{SessionToken, User};
use cradle_cart::CartLine;
use cradle_catalog::Product;
use cradle_core::{CartLineId, OrderId, ProductId, UserId};
use cradle_orders::Order;

pub use in_memory::{
    InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore, InMemorySessionStore,
    InMemoryUserDirectory,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The row store or network is unreachable. Retryable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row did not match the expected schema.
    #[error("row decode failed: {0}")]
    Decode(String),

    /// A uniqueness or state conflict (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// One cart line joined with its current product row.
///
/// Lines whose product no longer exists are dropped from the join, so a
/// total can never reference a missing price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedCartLine {
    pub line: CartLine,
    pub product: Product,
}

/// The four verbs the cart core needs, scoped by owning identity.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn insert_line(&self, user_id: UserId, line: &CartLine) -> StoreResult<()>;

    async fn update_line_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: u32,
    ) -> StoreResult<()>;

    async fn delete_line(&self, user_id: UserId, line_id: CartLineId) -> StoreResult<()>;

    /// Delete every line belonging to the identity (clear / post-checkout).
    async fn delete_lines_for_user(&self, user_id: UserId) -> StoreResult<()>;

    /// Read all of the identity's lines joined with item data.
    async fn fetch_lines(&self, user_id: UserId) -> StoreResult<Vec<JoinedCartLine>>;
}

/// Catalog rows. Reads are the storefront; writes are the admin surface.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn upsert(&self, product: &Product) -> StoreResult<()>;

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: ProductId) -> StoreResult<bool>;
}

/// Order rows. Orders are never deleted by the storefront; `delete` exists
/// solely for the checkout compensation path.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> StoreResult<()>;

    async fn get(&self, id: OrderId) -> StoreResult<Option<Order>>;

    async fn list_for_user(&self, user_id: UserId) -> StoreResult<Vec<Order>>;

    async fn list_all(&self) -> StoreResult<Vec<Order>>;

    async fn update(&self, order: &Order) -> StoreResult<()>;

    async fn delete(&self, id: OrderId) -> StoreResult<()>;
}

/// Identity collaborator: the user records behind the session gate.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert a new user; a duplicate email is a conflict.
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn get(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;
}

/// Opaque bearer tokens mapped to user identities.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: SessionToken, user_id: UserId) -> StoreResult<()>;

    async fn resolve(&self, token: SessionToken) -> StoreResult<Option<UserId>>;

    async fn revoke(&self, token: SessionToken) -> StoreResult<()>;
}
