use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cradle_core::{DomainError, DomainResult, Entity, ProductId};

/// Product category (fixed enumerated set).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Soap,
    BabyLotion,
    AdultLotion,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Soap, Category::BabyLotion, Category::AdultLotion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Soap => "soap",
            Category::BabyLotion => "baby_lotion",
            Category::AdultLotion => "adult_lotion",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soap" => Ok(Category::Soap),
            "baby_lotion" => Ok(Category::BabyLotion),
            "adult_lotion" => Ok(Category::AdultLotion),
            other => Err(DomainError::validation(format!(
                "unknown category '{other}' (expected soap, baby_lotion or adult_lotion)"
            ))),
        }
    }
}

/// A purchasable item.
///
/// Immutable from the cart's perspective within a session; the admin
/// lifecycle edits it through [`Product::apply_patch`] only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category: Category,
    /// Price in smallest currency unit (e.g., cents).
    price_cents: u64,
    image_url: String,
    stock: u32,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price_cents: u64,
    pub image_url: String,
    pub stock: u32,
    pub is_featured: bool,
}

/// Partial update applied by the admin surface. `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    pub stock: Option<u32>,
    pub is_featured: Option<bool>,
}

impl Product {
    pub fn create(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_name(&new.name)?;
        Ok(Self {
            id,
            name: new.name,
            description: new.description,
            category: new.category,
            price_cents: new.price_cents,
            image_url: new.image_url,
            stock: new.stock,
            is_featured: new.is_featured,
            created_at: now,
        })
    }

    /// Rehydrate from a stored row. Runs the same validation as creation so a
    /// row that drifted out of shape is rejected at the boundary.
    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: ProductId,
        name: String,
        description: String,
        category: Category,
        price_cents: u64,
        image_url: String,
        stock: u32,
        is_featured: bool,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        validate_name(&name)?;
        Ok(Self {
            id,
            name,
            description,
            category,
            price_cents,
            image_url,
            stock,
            is_featured,
            created_at,
        })
    }

    pub fn apply_patch(&mut self, patch: ProductPatch) -> DomainResult<()> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
        Ok(())
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_featured(&self) -> bool {
        self.is_featured
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Display concern only; the cart never enforces stock bounds.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("product name must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, price_cents: u64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "Gentle baby lotion".to_string(),
            category: Category::BabyLotion,
            price_cents,
            image_url: "https://example.com/lotion.png".to_string(),
            stock: 10,
            is_featured: true,
        }
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Product::create(ProductId::new(), new_product("   ", 1299), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_updates_only_provided_fields() {
        let mut product =
            Product::create(ProductId::new(), new_product("Baby Lotion", 1299), Utc::now())
                .unwrap();

        product
            .apply_patch(ProductPatch {
                price_cents: Some(1499),
                stock: Some(0),
                ..ProductPatch::default()
            })
            .unwrap();

        assert_eq!(product.price_cents(), 1499);
        assert_eq!(product.stock(), 0);
        assert!(!product.in_stock());
        assert_eq!(product.name(), "Baby Lotion");
        assert_eq!(product.category(), Category::BabyLotion);
    }

    #[test]
    fn patch_with_blank_name_is_rejected_and_leaves_product_unchanged() {
        let mut product =
            Product::create(ProductId::new(), new_product("Soft Soap", 550), Utc::now()).unwrap();

        let err = product
            .apply_patch(ProductPatch {
                name: Some(String::new()),
                ..ProductPatch::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(product.name(), "Soft Soap");
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("shampoo".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_to_snake_case() {
        let json = serde_json::to_string(&Category::BabyLotion).unwrap();
        assert_eq!(json, "\"baby_lotion\"");
    }
}
