//! End-to-end service tests over the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use cradle_auth::{Role, Session, User};
use cradle_cart::CartLine;
use cradle_catalog::{Category, NewProduct, Product, ProductPatch};
use cradle_core::{CartLineId, UserId};
use cradle_orders::{OrderStatus, PaymentStatus, ShippingAddress};

use crate::cart_service::{CartGuard, CartService};
use crate::catalog_service::CatalogService;
use crate::checkout_service::CheckoutService;
use crate::error::ServiceError;
use crate::identity_service::IdentityService;
use crate::order_service::OrderService;
use crate::payment::{ScriptedGateway, ScriptedOutcome};
use crate::store::{
    CartStore, InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore, InMemorySessionStore,
    InMemoryUserDirectory, JoinedCartLine, StoreError, StoreResult,
};

const ADMIN_EMAIL: &str = "admin@example.com";

struct Stack {
    products: Arc<InMemoryProductStore>,
    gateway: Arc<ScriptedGateway>,
    catalog: CatalogService,
    cart: CartService,
    checkout: CheckoutService,
    orders: OrderService,
    identity: IdentityService,
}

fn stack() -> Stack {
    let products = Arc::new(InMemoryProductStore::new());
    let cart_store = Arc::new(InMemoryCartStore::new(products.clone()));
    let order_store = Arc::new(InMemoryOrderStore::new());
    let gateway = Arc::new(ScriptedGateway::new());
    let guard = CartGuard::new();

    Stack {
        products: products.clone(),
        gateway: gateway.clone(),
        catalog: CatalogService::new(products.clone()),
        cart: CartService::new(cart_store.clone(), products, guard.clone()),
        checkout: CheckoutService::new(cart_store, order_store.clone(), gateway, guard),
        orders: OrderService::new(order_store),
        identity: IdentityService::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemorySessionStore::new()),
            ADMIN_EMAIL,
        ),
    }
}

fn customer_session() -> Session {
    let user = User::new(
        UserId::new(),
        "shopper@example.com",
        "Shopper",
        Role::User,
        Utc::now(),
    )
    .unwrap();
    Session::authenticated(user)
}

fn admin_session() -> Session {
    let user =
        User::new(UserId::new(), ADMIN_EMAIL, "Admin", Role::Admin, Utc::now()).unwrap();
    Session::authenticated(user)
}

fn address() -> ShippingAddress {
    ShippingAddress::new("123 Baby St", "New York", "NY", "10001", "US").unwrap()
}

async fn seed_product(stack: &Stack, name: &str, price_cents: u64) -> Product {
    stack
        .catalog
        .create_product(
            &admin_session(),
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                category: Category::BabyLotion,
                price_cents,
                image_url: String::new(),
                stock: 10,
                is_featured: false,
            },
            Utc::now(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn anonymous_sessions_cannot_touch_the_cart_or_checkout() {
    let stack = stack();
    let session = Session::anonymous();
    let product = seed_product(&stack, "Baby Lotion", 1299).await;

    let err = stack
        .cart
        .add_item(&session, product.id_typed(), 1)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Unauthenticated);

    let err = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Unauthenticated);
}

#[tokio::test]
async fn adding_an_unknown_product_is_not_found() {
    let stack = stack();
    let err = stack
        .cart
        .add_item(&customer_session(), cradle_core::ProductId::new(), 1)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NotFound);
}

#[tokio::test]
async fn repeated_adds_merge_and_totals_follow_the_example() {
    let stack = stack();
    let session = customer_session();
    let p1 = seed_product(&stack, "Baby Lotion", 1299).await;

    // addItem(p1, 2) -> one line, quantity 2, total 2 x price.
    let snapshot = stack.cart.add_item(&session, p1.id_typed(), 2).await.unwrap();
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.lines[0].quantity, 2);
    assert_eq!(snapshot.total_cents, 2 * 1299);

    // addItem(p1, 1) -> quantity 3, total 3 x price.
    let snapshot = stack.cart.add_item(&session, p1.id_typed(), 1).await.unwrap();
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.lines[0].quantity, 3);
    assert_eq!(snapshot.total_cents, 3 * 1299);
    assert_eq!(snapshot.count, 3);

    // removeItem(line) -> cart empty, total 0.
    let line_id = snapshot.lines[0].line_id;
    let snapshot = stack.cart.remove_line(&session, line_id).await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.total_cents, 0);
}

#[tokio::test]
async fn a_price_change_moves_the_total_with_no_cart_mutation() {
    let stack = stack();
    let session = customer_session();
    let product = seed_product(&stack, "Soft Soap", 550).await;

    stack.cart.add_item(&session, product.id_typed(), 2).await.unwrap();
    assert_eq!(stack.cart.snapshot(&session).await.unwrap().total_cents, 1100);

    stack
        .catalog
        .update_product(
            &admin_session(),
            product.id_typed(),
            ProductPatch {
                price_cents: Some(600),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();

    // Same lines, new price: the derived total tracks live pricing.
    let snapshot = stack.cart.snapshot(&session).await.unwrap();
    assert_eq!(snapshot.lines[0].quantity, 2);
    assert_eq!(snapshot.total_cents, 1200);
}

#[tokio::test]
async fn set_quantity_zero_removes_the_line_like_remove_does() {
    let stack = stack();
    let session = customer_session();
    let product = seed_product(&stack, "Soft Soap", 550).await;

    let snapshot = stack.cart.add_item(&session, product.id_typed(), 2).await.unwrap();
    let line_id = snapshot.lines[0].line_id;

    let snapshot = stack.cart.set_quantity(&session, line_id, 0).await.unwrap();
    assert!(snapshot.is_empty());

    // Unknown line afterwards: NotFound, a refresh-and-retry error.
    let err = stack.cart.set_quantity(&session, line_id, 2).await.unwrap_err();
    assert_eq!(err, ServiceError::NotFound);
}

#[tokio::test]
async fn submit_order_captures_the_total_and_empties_the_cart() {
    let stack = stack();
    let session = customer_session();
    let p1 = seed_product(&stack, "Baby Lotion", 1299).await;

    // 3 x 12.99 = 38.97
    stack.cart.add_item(&session, p1.id_typed(), 3).await.unwrap();

    let order_id = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap();

    let order = stack.orders.get(&session, order_id).await.unwrap();
    assert_eq!(order.total_cents(), 3897);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.payment_status(), PaymentStatus::Completed);
    assert!(order.payment_reference().is_some());

    // The gateway was asked for exactly the snapshot total.
    assert_eq!(stack.gateway.charged_amounts(), vec![3897]);

    let snapshot = stack.cart.snapshot(&session).await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.count, 0);

    // Exactly one order.
    assert_eq!(stack.orders.list_for_user(&session).await.unwrap().len(), 1);
}

#[tokio::test]
async fn a_later_price_change_never_moves_a_placed_order() {
    let stack = stack();
    let session = customer_session();
    let product = seed_product(&stack, "Soft Soap", 550).await;

    stack.cart.add_item(&session, product.id_typed(), 1).await.unwrap();
    let order_id = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap();

    stack
        .catalog
        .update_product(
            &admin_session(),
            product.id_typed(),
            ProductPatch {
                price_cents: Some(9999),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();

    let order = stack.orders.get(&session, order_id).await.unwrap();
    assert_eq!(order.total_cents(), 550);
}

#[tokio::test]
async fn submitting_an_empty_cart_creates_no_order() {
    let stack = stack();
    let session = customer_session();

    let err = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::EmptyCart);
    assert!(stack.orders.list_for_user(&session).await.unwrap().is_empty());
    assert!(stack.gateway.charged_amounts().is_empty());
}

#[tokio::test]
async fn declined_or_cancelled_payment_leaves_the_cart_unchanged() {
    let stack = stack();
    let session = customer_session();
    let product = seed_product(&stack, "Baby Lotion", 1299).await;
    stack.cart.add_item(&session, product.id_typed(), 2).await.unwrap();

    let before = stack.cart.snapshot(&session).await.unwrap();

    stack
        .gateway
        .push(ScriptedOutcome::Decline("insufficient funds".to_string()));
    let err = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::PaymentDeclined("insufficient funds".to_string())
    );

    stack.gateway.push(ScriptedOutcome::Cancel);
    let err = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::PaymentCancelled);

    // No order, identical lines and quantities.
    assert!(stack.orders.list_for_user(&session).await.unwrap().is_empty());
    let after = stack.cart.snapshot(&session).await.unwrap();
    assert_eq!(after, before);
}

/// Cart store wrapper whose clear can be made to fail once.
struct FlakyCartStore {
    inner: Arc<InMemoryCartStore>,
    fail_clear: std::sync::atomic::AtomicBool,
}

impl FlakyCartStore {
    fn new(inner: Arc<InMemoryCartStore>) -> Self {
        Self {
            inner,
            fail_clear: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn fail_next_clear(&self) {
        self.fail_clear.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl CartStore for FlakyCartStore {
    async fn insert_line(&self, user_id: UserId, line: &CartLine) -> StoreResult<()> {
        self.inner.insert_line(user_id, line).await
    }

    async fn update_line_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: u32,
    ) -> StoreResult<()> {
        self.inner.update_line_quantity(user_id, line_id, quantity).await
    }

    async fn delete_line(&self, user_id: UserId, line_id: CartLineId) -> StoreResult<()> {
        self.inner.delete_line(user_id, line_id).await
    }

    async fn delete_lines_for_user(&self, user_id: UserId) -> StoreResult<()> {
        if self.fail_clear.swap(false, std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        self.inner.delete_lines_for_user(user_id).await
    }

    async fn fetch_lines(&self, user_id: UserId) -> StoreResult<Vec<JoinedCartLine>> {
        self.inner.fetch_lines(user_id).await
    }
}

#[tokio::test]
async fn a_failed_cart_clear_compensates_the_order_insert() {
    let products = Arc::new(InMemoryProductStore::new());
    let inner = Arc::new(InMemoryCartStore::new(products.clone()));
    let flaky = Arc::new(FlakyCartStore::new(inner));
    let order_store = Arc::new(InMemoryOrderStore::new());
    let guard = CartGuard::new();

    let catalog = CatalogService::new(products.clone());
    let cart = CartService::new(flaky.clone(), products, guard.clone());
    let checkout = CheckoutService::new(
        flaky.clone(),
        order_store.clone(),
        Arc::new(ScriptedGateway::new()),
        guard,
    );
    let orders = OrderService::new(order_store);

    let session = customer_session();
    let product = catalog
        .create_product(
            &admin_session(),
            NewProduct {
                name: "Baby Lotion".to_string(),
                description: String::new(),
                category: Category::BabyLotion,
                price_cents: 1299,
                image_url: String::new(),
                stock: 10,
                is_featured: false,
            },
            Utc::now(),
        )
        .await
        .unwrap();
    cart.add_item(&session, product.id_typed(), 1).await.unwrap();

    flaky.fail_next_clear();
    let err = checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));

    // Neither half of the submit is observable.
    assert!(orders.list_for_user(&session).await.unwrap().is_empty());
    assert_eq!(cart.snapshot(&session).await.unwrap().count, 1);

    // Retry succeeds once the store is back.
    let order_id = checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap();
    assert!(orders.get(&session, order_id).await.is_ok());
    assert!(cart.snapshot(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn orders_are_invisible_to_other_customers_but_not_admins() {
    let stack = stack();
    let owner = customer_session();
    let product = seed_product(&stack, "Soft Soap", 550).await;
    stack.cart.add_item(&owner, product.id_typed(), 1).await.unwrap();
    let order_id = stack
        .checkout
        .submit_order(&owner, address(), Utc::now())
        .await
        .unwrap();

    let stranger = customer_session();
    assert_eq!(
        stack.orders.get(&stranger, order_id).await.unwrap_err(),
        ServiceError::NotFound
    );
    assert!(stack.orders.get(&admin_session(), order_id).await.is_ok());

    let err = stack.orders.list_all(&stranger, None).await.unwrap_err();
    assert_eq!(err, ServiceError::Forbidden);
    let all = stack.orders.list_all(&admin_session(), None).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn fulfillment_transitions_are_monotonic_through_the_service() {
    let stack = stack();
    let session = customer_session();
    let admin = admin_session();
    let product = seed_product(&stack, "Soft Soap", 550).await;
    stack.cart.add_item(&session, product.id_typed(), 1).await.unwrap();
    let order_id = stack
        .checkout
        .submit_order(&session, address(), Utc::now())
        .await
        .unwrap();

    let order = stack
        .orders
        .advance_status(&admin, order_id, OrderStatus::Shipped, Utc::now())
        .await
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Shipped);

    let err = stack
        .orders
        .advance_status(&admin, order_id, OrderStatus::Processing, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Invariant(_)));

    // Customers cannot drive fulfillment.
    let err = stack
        .orders
        .advance_status(&session, order_id, OrderStatus::Delivered, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Forbidden);
}

#[tokio::test]
async fn sign_up_assigns_roles_and_sessions_resolve_tokens() {
    let stack = stack();

    let (admin, admin_token) = stack
        .identity
        .sign_up(ADMIN_EMAIL, None, Utc::now())
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.name, "admin");

    let (user, _token) = stack
        .identity
        .sign_up("jo@example.com", Some("Jo".to_string()), Utc::now())
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);

    // Duplicate email conflicts.
    let err = stack
        .identity
        .sign_up("jo@example.com", None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Token resolution round-trips, and sign-out revokes.
    let session = stack.identity.session_for(Some(admin_token)).await.unwrap();
    assert!(session.is_admin());

    stack.identity.sign_out(admin_token).await.unwrap();
    let session = stack.identity.session_for(Some(admin_token)).await.unwrap();
    assert!(session.current_user().is_none());

    // Signing in again issues a fresh token.
    let (signed_in, token) = stack.identity.sign_in(ADMIN_EMAIL).await.unwrap();
    assert_eq!(signed_in.id, admin.id);
    let session = stack.identity.session_for(Some(token)).await.unwrap();
    assert_eq!(session.require_user_id().unwrap(), admin.id);
}
