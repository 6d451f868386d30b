//! Order history reads and the admin fulfillment transition.
//!
//! The storefront core never moves an order's status itself; that belongs
//! to the fulfillment process, which reaches in through the admin surface.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cradle_auth::Session;
use cradle_core::OrderId;
use cradle_orders::{Order, OrderStatus};

use crate::error::{ServiceError, ServiceResult};
use crate::store::OrderStore;

pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// The signed-in owner's orders, newest first.
    pub async fn list_for_user(&self, session: &Session) -> ServiceResult<Vec<Order>> {
        let user_id = session.require_user_id()?;
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// A single order, visible to its owner or to an admin. Anyone else gets
    /// `NotFound` rather than confirmation the order exists.
    pub async fn get(&self, session: &Session, id: OrderId) -> ServiceResult<Order> {
        let user = session.require_user()?;
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if order.user_id() != user.id && !session.is_admin() {
            return Err(ServiceError::NotFound);
        }
        Ok(order)
    }

    /// All orders, admin only. Optionally filtered by status.
    pub async fn list_all(
        &self,
        session: &Session,
        status: Option<OrderStatus>,
    ) -> ServiceResult<Vec<Order>> {
        session.require_admin()?;
        let orders = self.store.list_all().await?;
        Ok(match status {
            Some(status) => orders.into_iter().filter(|o| o.status() == status).collect(),
            None => orders,
        })
    }

    /// Advance an order along its fulfillment path (admin only). Backward
    /// transitions are invariant violations surfaced to the caller.
    pub async fn advance_status(
        &self,
        session: &Session,
        id: OrderId,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> ServiceResult<Order> {
        session.require_admin()?;
        let mut order = self
            .store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        order.transition(next, now)?;
        self.store.update(&order).await?;

        tracing::info!(order_id = %id, status = %next, "order status advanced");
        Ok(order)
    }
}
