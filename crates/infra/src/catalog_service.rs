//! Catalog reads and the admin product lifecycle.
//!
//! Reads are thin pass-throughs over the product store. Writes require an
//! elevated session; they never touch placed orders (snapshot totals) or
//! rewrite cart lines.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cradle_auth::Session;
use cradle_catalog::{Category, NewProduct, Product, ProductPatch};
use cradle_core::ProductId;

use crate::error::{ServiceError, ServiceResult};
use crate::store::ProductStore;

pub struct CatalogService {
    store: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: ProductId) -> ServiceResult<Product> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list_by_category(&self, category: Category) -> ServiceResult<Vec<Product>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|p| p.category() == category)
            .collect())
    }

    pub async fn featured(&self) -> ServiceResult<Vec<Product>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(Product::is_featured)
            .collect())
    }

    pub async fn create_product(
        &self,
        session: &Session,
        new: NewProduct,
        now: DateTime<Utc>,
    ) -> ServiceResult<Product> {
        session.require_admin()?;
        let product = Product::create(ProductId::new(), new, now)?;
        self.store.upsert(&product).await?;
        tracing::info!(product_id = %product.id_typed(), "product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        session: &Session,
        id: ProductId,
        patch: ProductPatch,
    ) -> ServiceResult<Product> {
        session.require_admin()?;
        let mut product = self.get(id).await?;
        product.apply_patch(patch)?;
        self.store.upsert(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, session: &Session, id: ProductId) -> ServiceResult<()> {
        session.require_admin()?;
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
