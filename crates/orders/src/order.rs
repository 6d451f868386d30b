use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cradle_core::{DomainError, DomainResult, Entity, OrderId, UserId, ValueObject};

/// Order status lifecycle.
///
/// Forward-only: `Pending -> Processing -> Shipped -> Delivered`, with
/// `Cancelled` reachable from `Pending`/`Processing` and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position along the fulfillment path; transitions never decrease it.
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            // Cancellation only before the parcel leaves.
            OrderStatus::Cancelled => {
                matches!(self, OrderStatus::Pending | OrderStatus::Processing)
            }
            _ => next.rank() > self.rank(),
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Payment status, set from the authorization outcome at submission and
/// only ever moved forward by the external fulfillment process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Structured shipping destination. All fields non-empty, validated at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    street: String,
    city: String,
    region: String,
    postal_code: String,
    country: String,
}

impl ShippingAddress {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> DomainResult<Self> {
        let address = Self {
            street: street.into(),
            city: city.into(),
            region: region.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        };

        for (field, value) in [
            ("street", &address.street),
            ("city", &address.city),
            ("region", &address.region),
            ("postal_code", &address.postal_code),
            ("country", &address.country),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "shipping address {field} must not be empty"
                )));
            }
        }

        Ok(address)
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl ValueObject for ShippingAddress {}

/// A placed order.
///
/// `total_cents` is captured at submission time and is immune to later price
/// changes. Only the status pair ever mutates after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    /// Snapshot of the cart total at submission, in smallest currency unit.
    total_cents: u64,
    shipping_address: ShippingAddress,
    payment_status: PaymentStatus,
    /// Authorization reference from the payment collaborator, when granted.
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order from a successful checkout.
    pub fn place(
        id: OrderId,
        user_id: UserId,
        total_cents: u64,
        shipping_address: ShippingAddress,
        payment_status: PaymentStatus,
        payment_reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            status: OrderStatus::Pending,
            total_cents,
            shipping_address,
            payment_status,
            payment_reference,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate from a stored row.
    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
        total_cents: u64,
        shipping_address: ShippingAddress,
        payment_status: PaymentStatus,
        payment_reference: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            total_cents,
            shipping_address,
            payment_status,
            payment_reference,
            created_at,
            updated_at,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_cents(&self) -> u64 {
        self.total_cents
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Advance the fulfillment status. Backward or out-of-path transitions
    /// are invariant violations.
    pub fn transition(&mut self, next: OrderStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot transition order from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Settle the payment status (external fulfillment/settlement process).
    pub fn settle_payment(
        &mut self,
        next: PaymentStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.payment_status.can_transition_to(next) {
            return Err(DomainError::invariant(
                "payment status can only move from pending to completed or failed",
            ));
        }
        self.payment_status = next;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
