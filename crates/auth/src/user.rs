use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cradle_core::{DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// An authenticated principal: the owning identity of carts and orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let email = email.into();
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        Ok(Self {
            id,
            email,
            name,
            role,
            created_at,
        })
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
