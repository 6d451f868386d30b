use serde::Deserialize;
use serde_json::json;

use cradle_auth::User;
use cradle_catalog::{Category, NewProduct, Product, ProductPatch};
use cradle_infra::cart_service::CartSnapshot;
use cradle_orders::{OrderStatus, Order};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

fn default_add_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    /// Omitted quantity means "one more of this product".
    #[serde(default = "default_add_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ShippingAddressRequest {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddressRequest,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub price_cents: u64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub is_featured: bool,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(value: CreateProductRequest) -> Self {
        NewProduct {
            name: value.name,
            description: value.description,
            category: value.category,
            price_cents: value.price_cents,
            image_url: value.image_url,
            stock: value.stock,
            is_featured: value.is_featured,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    pub stock: Option<u32>,
    pub is_featured: Option<bool>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(value: UpdateProductRequest) -> Self {
        ProductPatch {
            name: value.name,
            description: value.description,
            category: value.category,
            price_cents: value.price_cents,
            image_url: value.image_url,
            stock: value.stock,
            is_featured: value.is_featured,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: OrderStatus,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id_typed().to_string(),
        "name": product.name(),
        "description": product.description(),
        "category": product.category().as_str(),
        "price_cents": product.price_cents(),
        "image_url": product.image_url(),
        "stock": product.stock(),
        "in_stock": product.in_stock(),
        "is_featured": product.is_featured(),
        "created_at": product.created_at().to_rfc3339(),
    })
}

pub fn cart_to_json(snapshot: &CartSnapshot) -> serde_json::Value {
    json!({
        "lines": snapshot
            .lines
            .iter()
            .map(|line| json!({
                "line_id": line.line_id.to_string(),
                "product": product_to_json(&line.product),
                "quantity": line.quantity,
                "line_total_cents": line.line_total_cents,
            }))
            .collect::<Vec<_>>(),
        "total_cents": snapshot.total_cents,
        "count": snapshot.count,
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    let address = order.shipping_address();
    json!({
        "id": order.id_typed().to_string(),
        "user_id": order.user_id().to_string(),
        "status": order.status().to_string(),
        "total_cents": order.total_cents(),
        "shipping_address": {
            "street": address.street(),
            "city": address.city(),
            "region": address.region(),
            "postal_code": address.postal_code(),
            "country": address.country(),
        },
        "payment_status": order.payment_status().to_string(),
        "payment_reference": order.payment_reference(),
        "created_at": order.created_at().to_rfc3339(),
        "updated_at": order.updated_at().to_rfc3339(),
    })
}

pub fn user_to_json(user: &User) -> serde_json::Value {
    json!({
        "id": user.id.to_string(),
        "email": user.email,
        "name": user.name,
        "role": user.role.as_str(),
        "created_at": user.created_at.to_rfc3339(),
    })
}
