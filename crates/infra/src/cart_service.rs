//! Cart orchestration: gate, load, decide, persist, re-read.
//!
//! The pipeline mirrors the row store's read-modify-write shape: fetch the
//! owner's lines, rehydrate the aggregate, run the pure decision logic, map
//! each resulting change onto a store verb, then re-read so totals reflect
//! live prices.

use std::sync::Arc;

use cradle_auth::Session;
use cradle_cart::{totals, Cart, CartChange, CartCommand};
use cradle_catalog::Product;
use cradle_core::{CartLineId, ProductId, UserId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{CartStore, JoinedCartLine, ProductStore};

/// Serializes cart mutations for one service instance.
///
/// While a mutation's store calls are suspended, a second mutation for the
/// same owner must not start a stale read-modify-write (lost updates from
/// two rapid add-to-cart clicks). Checkout shares this guard because it also
/// clears lines. Cross-client coordination is explicitly out of scope.
#[derive(Clone, Default)]
pub struct CartGuard(Arc<tokio::sync::Mutex<()>>);

impl CartGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn acquire(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.0.lock().await
    }
}

/// One line of the joined read, priced at the current product price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub line_id: CartLineId,
    pub product: Product,
    pub quantity: u32,
    pub line_total_cents: u64,
}

/// Derived view of a cart. Never stored; recomputed on every read so the
/// displayed total cannot drift from live pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLineView>,
    pub total_cents: u64,
    pub count: u32,
}

impl CartSnapshot {
    pub fn from_joined(rows: Vec<JoinedCartLine>) -> Self {
        let (total_cents, count) = totals(
            rows.iter()
                .map(|row| (row.line.quantity, row.product.price_cents())),
        );

        let lines = rows
            .into_iter()
            .map(|row| CartLineView {
                line_id: row.line.id,
                line_total_cents: u64::from(row.line.quantity)
                    .saturating_mul(row.product.price_cents()),
                quantity: row.line.quantity,
                product: row.product,
            })
            .collect();

        Self {
            lines,
            total_cents,
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct CartService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductStore>,
    guard: CartGuard,
}

impl CartService {
    pub fn new(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductStore>,
        guard: CartGuard,
    ) -> Self {
        Self {
            store,
            products,
            guard,
        }
    }

    /// Current cart for the signed-in owner, priced at read time.
    pub async fn snapshot(&self, session: &Session) -> ServiceResult<CartSnapshot> {
        let user_id = session.require_user_id()?;
        let rows = self.store.fetch_lines(user_id).await?;
        Ok(CartSnapshot::from_joined(rows))
    }

    pub async fn add_item(
        &self,
        session: &Session,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<CartSnapshot> {
        // The product must exist at add time; stock bounds stay a display
        // concern of the catalog.
        if self.products.get(product_id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }

        self.mutate(
            session,
            CartCommand::AddItem {
                product_id,
                quantity,
            },
        )
        .await
    }

    pub async fn remove_line(
        &self,
        session: &Session,
        line_id: CartLineId,
    ) -> ServiceResult<CartSnapshot> {
        self.mutate(session, CartCommand::RemoveLine { line_id }).await
    }

    pub async fn set_quantity(
        &self,
        session: &Session,
        line_id: CartLineId,
        quantity: u32,
    ) -> ServiceResult<CartSnapshot> {
        self.mutate(session, CartCommand::SetQuantity { line_id, quantity })
            .await
    }

    pub async fn clear(&self, session: &Session) -> ServiceResult<CartSnapshot> {
        self.mutate(session, CartCommand::Clear).await
    }

    async fn mutate(&self, session: &Session, command: CartCommand) -> ServiceResult<CartSnapshot> {
        let user_id = session.require_user_id()?;

        // One read-modify-write at a time; see CartGuard.
        let _serialized = self.guard.acquire().await;

        let rows = self.store.fetch_lines(user_id).await?;
        let cart = Cart::from_lines(user_id, rows.iter().map(|row| row.line).collect());

        let changes = cart.handle(&command)?;
        for change in &changes {
            self.persist(user_id, change).await?;
        }

        tracing::debug!(
            user_id = %user_id,
            changes = changes.len(),
            "cart mutation applied"
        );

        let rows = self.store.fetch_lines(user_id).await?;
        Ok(CartSnapshot::from_joined(rows))
    }

    async fn persist(&self, user_id: UserId, change: &CartChange) -> ServiceResult<()> {
        match change {
            CartChange::LineInserted(line) => self.store.insert_line(user_id, line).await?,
            CartChange::QuantitySet { line_id, quantity } => {
                self.store
                    .update_line_quantity(user_id, *line_id, *quantity)
                    .await?
            }
            CartChange::LineRemoved { line_id } => {
                self.store.delete_line(user_id, *line_id).await?
            }
            CartChange::Cleared => self.store.delete_lines_for_user(user_id).await?,
        }
        Ok(())
    }
}
