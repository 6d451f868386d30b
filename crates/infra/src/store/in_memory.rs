//! In-memory row store adapters for dev and tests.
//!
//! Rows are held as JSON documents and pushed through the explicit schemas
//! in [`rows`](super::rows) on every read, the same way a remote row store's
//! responses would be.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;

use cradle_auth::{SessionToken, User};
use cradle_cart::CartLine;
use cradle_catalog::Product;
use cradle_core::{CartLineId, OrderId, ProductId, UserId};
use cradle_orders::Order;

use super::rows::{decode_row, encode_row, CartLineRow, OrderRow, ProductRow, UserRow};
use super::{
    CartStore, JoinedCartLine, OrderStore, ProductStore, SessionStore, StoreError, StoreResult,
    UserDirectory,
};

fn lock_poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, JsonValue>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn upsert(&self, product: &Product) -> StoreResult<()> {
        let value = encode_row(&ProductRow::from_domain(product), "product")?;
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.insert(product.id_typed(), value);
        Ok(())
    }

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        match rows.get(&id) {
            Some(value) => {
                let row: ProductRow = decode_row(value, "product")?;
                Ok(Some(row.into_domain()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut products = Vec::with_capacity(rows.len());
        for value in rows.values() {
            let row: ProductRow = decode_row(value, "product")?;
            products.push(row.into_domain()?);
        }
        products.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(products)
    }

    async fn delete(&self, id: ProductId) -> StoreResult<bool> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        Ok(rows.remove(&id).is_some())
    }
}

/// Cart lines keyed by line id, joined against the product store on read.
#[derive(Debug)]
pub struct InMemoryCartStore {
    rows: RwLock<HashMap<CartLineId, JsonValue>>,
    products: Arc<InMemoryProductStore>,
}

impl InMemoryCartStore {
    pub fn new(products: Arc<InMemoryProductStore>) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            products,
        }
    }

    fn decoded_lines_for(&self, user_id: UserId) -> StoreResult<Vec<CartLineRow>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut lines = Vec::new();
        for value in rows.values() {
            let row: CartLineRow = decode_row(value, "cart line")?;
            if row.user_id == user_id {
                lines.push(row);
            }
        }
        lines.sort_by_key(|row| row.created_at);
        Ok(lines)
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn insert_line(&self, user_id: UserId, line: &CartLine) -> StoreResult<()> {
        let value = encode_row(&CartLineRow::new(user_id, line, Utc::now()), "cart line")?;
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.insert(line.id, value);
        Ok(())
    }

    async fn update_line_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: u32,
    ) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        // A line deleted by a racing session is benign; refresh will show it.
        if let Some(value) = rows.get(&line_id) {
            let mut row: CartLineRow = decode_row(value, "cart line")?;
            if row.user_id != user_id {
                return Ok(());
            }
            row.quantity = quantity;
            let value = encode_row(&row, "cart line")?;
            rows.insert(line_id, value);
        }
        Ok(())
    }

    async fn delete_line(&self, user_id: UserId, line_id: CartLineId) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        if let Some(value) = rows.get(&line_id) {
            let row: CartLineRow = decode_row(value, "cart line")?;
            if row.user_id == user_id {
                rows.remove(&line_id);
            }
        }
        Ok(())
    }

    async fn delete_lines_for_user(&self, user_id: UserId) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        let mut doomed = Vec::new();
        for (id, value) in rows.iter() {
            let row: CartLineRow = decode_row(value, "cart line")?;
            if row.user_id == user_id {
                doomed.push(*id);
            }
        }
        for id in doomed {
            rows.remove(&id);
        }
        Ok(())
    }

    async fn fetch_lines(&self, user_id: UserId) -> StoreResult<Vec<JoinedCartLine>> {
        let lines = self.decoded_lines_for(user_id)?;
        let mut joined = Vec::with_capacity(lines.len());
        let mut dangling = Vec::new();
        for row in lines {
            // Lines whose product has been deleted are dropped from the
            // join and their rows purged, so they cannot pile up or come
            // back if the product id is ever reused.
            match self.products.get(row.product_id).await? {
                Some(product) => joined.push(JoinedCartLine {
                    line: row.into_line(),
                    product,
                }),
                None => dangling.push(row.id),
            }
        }

        if !dangling.is_empty() {
            let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
            for id in dangling {
                rows.remove(&id);
            }
        }

        Ok(joined)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    rows: RwLock<HashMap<OrderId, JsonValue>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_all(&self) -> StoreResult<Vec<Order>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut orders = Vec::with_capacity(rows.len());
        for value in rows.values() {
            let row: OrderRow = decode_row(value, "order")?;
            orders.push(row.into_domain());
        }
        // Newest first, matching the storefront's order history view.
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(orders)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        let value = encode_row(&OrderRow::from_domain(order), "order")?;
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.insert(order.id_typed(), value);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        match rows.get(&id) {
            Some(value) => {
                let row: OrderRow = decode_row(value, "order")?;
                Ok(Some(row.into_domain()))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: UserId) -> StoreResult<Vec<Order>> {
        Ok(self
            .decode_all()?
            .into_iter()
            .filter(|o| o.user_id() == user_id)
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<Order>> {
        self.decode_all()
    }

    async fn update(&self, order: &Order) -> StoreResult<()> {
        let value = encode_row(&OrderRow::from_domain(order), "order")?;
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.insert(order.id_typed(), value);
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.remove(&id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    rows: RwLock<HashMap<UserId, JsonValue>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let value = encode_row(&UserRow::from_domain(user), "user")?;
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        for existing in rows.values() {
            let row: UserRow = decode_row(existing, "user")?;
            if row.email.eq_ignore_ascii_case(&user.email) {
                return Err(StoreError::Conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }
        }
        rows.insert(user.id, value);
        Ok(())
    }

    async fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        match rows.get(&id) {
            Some(value) => {
                let row: UserRow = decode_row(value, "user")?;
                Ok(Some(row.into_domain()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        for value in rows.values() {
            let row: UserRow = decode_row(value, "user")?;
            if row.email.eq_ignore_ascii_case(email) {
                return Ok(Some(row.into_domain()?));
            }
        }
        Ok(None)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut users = Vec::with_capacity(rows.len());
        for value in rows.values() {
            let row: UserRow = decode_row(value, "user")?;
            users.push(row.into_domain()?);
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

/// Token map. Tokens are server-side state, not rows of the remote store,
/// so they skip the JSON document representation.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    tokens: RwLock<HashMap<SessionToken, UserId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: SessionToken, user_id: UserId) -> StoreResult<()> {
        let mut tokens = self.tokens.write().map_err(|_| lock_poisoned())?;
        tokens.insert(token, user_id);
        Ok(())
    }

    async fn resolve(&self, token: SessionToken) -> StoreResult<Option<UserId>> {
        let tokens = self.tokens.read().map_err(|_| lock_poisoned())?;
        Ok(tokens.get(&token).copied())
    }

    async fn revoke(&self, token: SessionToken) -> StoreResult<()> {
        let mut tokens = self.tokens.write().map_err(|_| lock_poisoned())?;
        tokens.remove(&token);
        Ok(())
    }
}
