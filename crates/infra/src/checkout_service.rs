//! Order submission: the one-shot transformation of a cart plus a shipping
//! form into a persisted order, followed by cart clearing.
//!
//! Effectively atomic from the caller's point of view: either an order
//! exists and the cart is empty, or no order was created and the cart is
//! unchanged. The row store has no transactions, so the insert-then-clear
//! pair is protected by a compensating delete of the order when the clear
//! fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cradle_auth::Session;
use cradle_cart::totals;
use cradle_core::OrderId;
use cradle_orders::{Order, PaymentStatus, ShippingAddress};

use crate::cart_service::CartGuard;
use crate::error::{ServiceError, ServiceResult};
use crate::payment::PaymentGateway;
use crate::store::{CartStore, OrderStore};

pub struct CheckoutService {
    cart_store: Arc<dyn CartStore>,
    order_store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
    guard: CartGuard,
}

impl CheckoutService {
    pub fn new(
        cart_store: Arc<dyn CartStore>,
        order_store: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        guard: CartGuard,
    ) -> Self {
        Self {
            cart_store,
            order_store,
            gateway,
            guard,
        }
    }

    /// Submit the signed-in owner's cart as an order.
    ///
    /// The total is captured from the live joined read at the instant of
    /// submission; later price changes never move a placed order.
    pub async fn submit_order(
        &self,
        session: &Session,
        shipping_address: ShippingAddress,
        now: DateTime<Utc>,
    ) -> ServiceResult<OrderId> {
        let user_id = session.require_user_id()?;

        // Holds off concurrent cart mutations while the cart is read,
        // charged and cleared.
        let _serialized = self.guard.acquire().await;

        let rows = self.cart_store.fetch_lines(user_id).await?;
        if rows.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let (total_cents, count) = totals(
            rows.iter()
                .map(|row| (row.line.quantity, row.product.price_cents())),
        );

        // Any payment failure aborts with the cart untouched.
        let authorization = self.gateway.authorize(total_cents).await?;

        let order = Order::place(
            OrderId::new(),
            user_id,
            total_cents,
            shipping_address,
            PaymentStatus::Completed,
            Some(authorization.reference),
            now,
        );
        let order_id = order.id_typed();

        self.order_store.insert(&order).await?;

        if let Err(clear_err) = self.cart_store.delete_lines_for_user(user_id).await {
            // Compensate so the caller never observes order-created with the
            // cart still intact.
            tracing::warn!(
                order_id = %order_id,
                error = %clear_err,
                "cart clear failed after order insert; compensating"
            );
            if let Err(delete_err) = self.order_store.delete(order_id).await {
                tracing::error!(
                    order_id = %order_id,
                    error = %delete_err,
                    "failed to compensate order insert"
                );
            }
            return Err(clear_err.into());
        }

        tracing::info!(
            order_id = %order_id,
            user_id = %user_id,
            total_cents,
            count,
            "order placed"
        );

        Ok(order_id)
    }
}
