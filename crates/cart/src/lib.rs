//! `cradle-cart` — the cart aggregate.
//!
//! A cart is a mapping from product identity to a positive quantity, scoped
//! to exactly one owning identity. Decision logic ([`Cart::handle`]) is pure
//! and returns [`CartChange`]s; state evolution ([`Cart::apply`]) and
//! persistence (mapping each change onto a row-store verb) happen elsewhere.

pub mod cart;

pub use cart::{totals, Cart, CartChange, CartCommand, CartLine};
