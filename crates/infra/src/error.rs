//! Service-level error model.
//!
//! Flattens the deterministic domain taxonomy, store failures and payment
//! outcomes into the one enum the API layer maps to responses. Nothing here
//! is fatal to the process; every variant is recoverable by user retry or
//! navigation.

use thiserror::Error;

use cradle_core::DomainError;

use crate::payment::PaymentError;
use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No owning identity; the caller redirects to sign-in.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Identity present but not elevated.
    #[error("forbidden")]
    Forbidden,

    /// Checkout against an empty cart; the caller redirects to the cart view.
    #[error("cart is empty")]
    EmptyCart,

    #[error("not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The payment collaborator declined the authorization. The cart is
    /// left intact for retry.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// The customer abandoned the payment exchange. The cart is left intact.
    #[error("payment cancelled")]
    PaymentCancelled,

    /// The row store or network is unreachable; retryable. The cart must not
    /// be assumed cleared nor the order created until a success is observed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Unauthenticated => ServiceError::Unauthenticated,
            DomainError::Forbidden => ServiceError::Forbidden,
            DomainError::EmptyCart => ServiceError::EmptyCart,
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::InvalidId(msg),
            DomainError::InvariantViolation(msg) => ServiceError::Invariant(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Store(other),
        }
    }
}

impl From<PaymentError> for ServiceError {
    fn from(value: PaymentError) -> Self {
        match value {
            PaymentError::Declined(reason) => ServiceError::PaymentDeclined(reason),
            PaymentError::Cancelled => ServiceError::PaymentCancelled,
            PaymentError::Unavailable(msg) => ServiceError::Store(StoreError::Unavailable(msg)),
        }
    }
}
