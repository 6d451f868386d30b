//! Payment collaborator.
//!
//! A single request/response exchange: given an amount, the gateway returns
//! either an authorization reference or a failure/cancellation signal. The
//! gateway's internal protocol is out of scope; the storefront only reacts
//! to the outcome.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthorization {
    /// Opaque reference issued by the gateway, stored on the order.
    pub reference: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The gateway refused the charge. The cart stays intact for retry.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The customer abandoned the payment exchange.
    #[error("payment cancelled")]
    Cancelled,

    /// The gateway could not be reached. Retryable.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(&self, amount_cents: u64) -> Result<PaymentAuthorization, PaymentError>;
}

/// One scripted response of the [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    Authorize,
    Decline(String),
    Cancel,
    Unavailable(String),
}

/// In-memory gateway for dev and tests.
///
/// Pops one scripted outcome per authorization; an empty script authorizes
/// everything. Records every requested amount so tests can assert on what
/// was actually charged.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    charged: Mutex<Vec<u64>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: ScriptedOutcome) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    /// Amounts of every authorization attempt, in order.
    pub fn charged_amounts(&self) -> Vec<u64> {
        self.charged.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn authorize(&self, amount_cents: u64) -> Result<PaymentAuthorization, PaymentError> {
        if let Ok(mut charged) = self.charged.lock() {
            charged.push(amount_cents);
        }

        let outcome = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(ScriptedOutcome::Authorize);

        match outcome {
            ScriptedOutcome::Authorize => Ok(PaymentAuthorization {
                reference: format!("auth-{}", Uuid::now_v7()),
            }),
            ScriptedOutcome::Decline(reason) => Err(PaymentError::Declined(reason)),
            ScriptedOutcome::Cancel => Err(PaymentError::Cancelled),
            ScriptedOutcome::Unavailable(msg) => Err(PaymentError::Unavailable(msg)),
        }
    }
}
