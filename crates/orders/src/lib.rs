//! `cradle-orders` — placed orders.
//!
//! An order is created exactly once per checkout with a snapshot total and
//! then only ever moves forward through its status lifecycle. Orders are
//! never deleted by the storefront (the lone exception is the compensation
//! path when checkout fails halfway; see `cradle-infra`).

pub mod order;

pub use order::{Order, OrderStatus, PaymentStatus, ShippingAddress};
