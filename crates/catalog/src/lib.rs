//! `cradle-catalog` — purchasable items and their category index.
//!
//! Read-only from the cart's perspective: a product referenced by a cart line
//! is never mutated by cart operations, and placed orders carry a snapshot
//! total that later price edits cannot move.

pub mod product;

pub use product::{Category, NewProduct, Product, ProductPatch};
