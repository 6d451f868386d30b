//! Explicit row schemas for the row store.
//!
//! Rows travel as JSON documents; these types are the single place that
//! shape is pinned down. Decoding happens on every read and failures are
//! [`StoreError::Decode`], never a panic.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use cradle_auth::{Role, User};
use cradle_cart::CartLine;
use cradle_catalog::{Category, Product};
use cradle_core::{CartLineId, OrderId, ProductId, UserId};
use cradle_orders::{Order, OrderStatus, PaymentStatus, ShippingAddress};

use super::{StoreError, StoreResult};

pub fn encode_row<T: Serialize>(row: &T, what: &str) -> StoreResult<JsonValue> {
    serde_json::to_value(row).map_err(|e| StoreError::Decode(format!("{what}: encode: {e}")))
}

pub fn decode_row<T: DeserializeOwned>(value: &JsonValue, what: &str) -> StoreResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| StoreError::Decode(format!("{what}: {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price_cents: u64,
    pub image_url: String,
    pub stock: u32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn from_domain(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            category: product.category(),
            price_cents: product.price_cents(),
            image_url: product.image_url().to_string(),
            stock: product.stock(),
            is_featured: product.is_featured(),
            created_at: product.created_at(),
        }
    }

    pub fn into_domain(self) -> StoreResult<Product> {
        Product::from_stored(
            self.id,
            self.name,
            self.description,
            self.category,
            self.price_cents,
            self.image_url,
            self.stock,
            self.is_featured,
            self.created_at,
        )
        .map_err(|e| StoreError::Decode(format!("product row {}: {e}", self.id)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRow {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

impl CartLineRow {
    pub fn new(user_id: UserId, line: &CartLine, created_at: DateTime<Utc>) -> Self {
        Self {
            id: line.id,
            user_id,
            product_id: line.product_id,
            quantity: line.quantity,
            created_at,
        }
    }

    pub fn into_line(self) -> CartLine {
        CartLine {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_cents: u64,
    pub shipping_address: ShippingAddress,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id_typed(),
            user_id: order.user_id(),
            status: order.status(),
            total_cents: order.total_cents(),
            shipping_address: order.shipping_address().clone(),
            payment_status: order.payment_status(),
            payment_reference: order.payment_reference().map(str::to_string),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }

    pub fn into_domain(self) -> Order {
        Order::from_stored(
            self.id,
            self.user_id,
            self.status,
            self.total_cents,
            self.shipping_address,
            self.payment_status,
            self.payment_reference,
            self.created_at,
            self.updated_at,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }

    pub fn into_domain(self) -> StoreResult<User> {
        User::new(self.id, self.email, self.name, self.role, self.created_at)
            .map_err(|e| StoreError::Decode(format!("user row {}: {e}", self.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_row_round_trips_through_json() {
        let product = Product::create(
            ProductId::new(),
            cradle_catalog::NewProduct {
                name: "Baby Lotion".to_string(),
                description: "Gentle baby lotion".to_string(),
                category: Category::BabyLotion,
                price_cents: 1299,
                image_url: "https://example.com/lotion.png".to_string(),
                stock: 10,
                is_featured: true,
            },
            Utc::now(),
        )
        .unwrap();

        let value = encode_row(&ProductRow::from_domain(&product), "product").unwrap();
        let row: ProductRow = decode_row(&value, "product").unwrap();
        assert_eq!(row.into_domain().unwrap(), product);
    }

    #[test]
    fn malformed_row_is_a_decode_error() {
        let value = serde_json::json!({ "id": "not-a-uuid", "quantity": -3 });
        let err = decode_row::<CartLineRow>(&value, "cart line").unwrap_err();
        match err {
            StoreError::Decode(msg) => assert!(msg.starts_with("cart line")),
            _ => panic!("expected decode error"),
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        let order = Order::place(
            OrderId::new(),
            UserId::new(),
            3897,
            ShippingAddress::new("123 Baby St", "New York", "NY", "10001", "US").unwrap(),
            PaymentStatus::Completed,
            None,
            Utc::now(),
        );
        let mut value = encode_row(&OrderRow::from_domain(&order), "order").unwrap();
        value["status"] = serde_json::json!("teleported");

        assert!(decode_row::<OrderRow>(&value, "order").is_err());
    }
}
