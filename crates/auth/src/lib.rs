//! `cradle-auth` — identity and session gating.
//!
//! Who a cart or order belongs to, and whether that identity may perform
//! elevated (admin) operations. All storefront mutations consult the
//! [`Session`] gate first and fail closed when no identity is present.

pub mod role;
pub mod session;
pub mod user;

pub use role::Role;
pub use session::{Session, SessionToken};
pub use user::User;
