//! Infrastructure wiring: in-memory stores, gateway, and the application
//! services handed to the routes.

use std::sync::Arc;

use chrono::Utc;

use cradle_catalog::{Category, NewProduct, Product};
use cradle_core::ProductId;
use cradle_infra::cart_service::{CartGuard, CartService};
use cradle_infra::catalog_service::CatalogService;
use cradle_infra::checkout_service::CheckoutService;
use cradle_infra::identity_service::IdentityService;
use cradle_infra::order_service::OrderService;
use cradle_infra::payment::ScriptedGateway;
use cradle_infra::store::{
    InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore, InMemorySessionStore,
    InMemoryUserDirectory, ProductStore,
};

pub struct AppServices {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub identity: Arc<IdentityService>,
}

/// Wire the full service graph over in-memory adapters.
///
/// The cart and checkout services share one [`CartGuard`] so a checkout's
/// read-charge-clear sequence cannot interleave with a cart mutation.
pub async fn build_in_memory_services(admin_email: &str, seed_demo: bool) -> AppServices {
    let products = Arc::new(InMemoryProductStore::new());
    let cart_store = Arc::new(InMemoryCartStore::new(products.clone()));
    let order_store = Arc::new(InMemoryOrderStore::new());
    let gateway = Arc::new(ScriptedGateway::new());
    let guard = CartGuard::new();

    if seed_demo {
        seed_demo_catalog(products.as_ref()).await;
    }

    AppServices {
        catalog: CatalogService::new(products.clone()),
        cart: CartService::new(cart_store.clone(), products, guard.clone()),
        checkout: CheckoutService::new(cart_store, order_store.clone(), gateway, guard),
        orders: OrderService::new(order_store),
        identity: Arc::new(IdentityService::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemorySessionStore::new()),
            admin_email,
        )),
    }
}

/// A small starter catalog so a fresh process has something to browse.
async fn seed_demo_catalog(products: &dyn ProductStore) {
    let seed = [
        ("Gentle Baby Lotion", Category::BabyLotion, 1299, true),
        ("Calming Baby Lotion", Category::BabyLotion, 1499, false),
        ("Oatmeal Soap Bar", Category::Soap, 550, true),
        ("Charcoal Soap Bar", Category::Soap, 650, false),
        ("Shea Body Lotion", Category::AdultLotion, 1899, true),
    ];

    for (name, category, price_cents, is_featured) in seed {
        let new = NewProduct {
            name: name.to_string(),
            description: String::new(),
            category,
            price_cents,
            image_url: String::new(),
            stock: 25,
            is_featured,
        };

        match Product::create(ProductId::new(), new, Utc::now()) {
            Ok(product) => {
                if let Err(err) = products.upsert(&product).await {
                    tracing::warn!(error = %err, name, "failed to seed product");
                }
            }
            Err(err) => tracing::warn!(error = %err, name, "invalid seed product"),
        }
    }
}
