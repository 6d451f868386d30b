use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cradle_core::{DomainError, DomainResult, UserId};

use crate::{Role, User};

/// Opaque bearer token handed to a client at sign-in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("SessionToken: {e}")))?;
        Ok(Self(uuid))
    }
}

/// The session gate: current owning identity, or none.
///
/// Constructed per request from whatever resolved the caller's credentials.
/// Every cart/checkout/order operation consults this first and fails closed
/// with [`DomainError::Unauthenticated`] when no identity is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A session with no identity (anonymous visitor).
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Elevated access, derived from the user's role attribute only.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    /// Require an owning identity; fail closed otherwise.
    pub fn require_user(&self) -> DomainResult<&User> {
        self.user.as_ref().ok_or(DomainError::Unauthenticated)
    }

    /// Convenience for operations keyed by owner.
    pub fn require_user_id(&self) -> DomainResult<UserId> {
        Ok(self.require_user()?.id)
    }

    /// Require an elevated identity. Unauthenticated beats forbidden: an
    /// anonymous caller is told to sign in, not that it lacks a role.
    pub fn require_admin(&self) -> DomainResult<&User> {
        let user = self.require_user()?;
        if user.role.is_admin() {
            Ok(user)
        } else {
            Err(DomainError::Forbidden)
        }
    }
}
