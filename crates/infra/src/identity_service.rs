//! Sign-up, sign-in and token resolution.
//!
//! Sessions are opaque server-side tokens; the bootstrap admin email is the
//! only way an elevated role is assigned, so `is_admin` stays a pure
//! derivation of the stored role attribute.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cradle_auth::{Role, Session, SessionToken, User};
use cradle_core::UserId;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{SessionStore, UserDirectory};

pub struct IdentityService {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    admin_email: String,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            users,
            sessions,
            admin_email: admin_email.into(),
        }
    }

    /// Register a new user and open a session for it.
    ///
    /// The display name defaults to the email's local part when omitted.
    pub async fn sign_up(
        &self,
        email: &str,
        name: Option<String>,
        now: DateTime<Utc>,
    ) -> ServiceResult<(User, SessionToken)> {
        let role = if email.eq_ignore_ascii_case(&self.admin_email) {
            Role::Admin
        } else {
            Role::User
        };

        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

        let user = User::new(UserId::new(), email, name, role, now)?;
        self.users.insert(&user).await?;

        let token = self.open_session(user.id).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user signed up");
        Ok((user, token))
    }

    /// Open a session for an existing user.
    pub async fn sign_in(&self, email: &str) -> ServiceResult<(User, SessionToken)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let token = self.open_session(user.id).await?;
        Ok((user, token))
    }

    pub async fn sign_out(&self, token: SessionToken) -> ServiceResult<()> {
        self.sessions.revoke(token).await?;
        Ok(())
    }

    /// Resolve a bearer token to a session: authenticated when the token is
    /// live and its user still exists, anonymous otherwise.
    pub async fn session_for(&self, token: Option<SessionToken>) -> ServiceResult<Session> {
        let Some(token) = token else {
            return Ok(Session::anonymous());
        };

        let Some(user_id) = self.sessions.resolve(token).await? else {
            return Ok(Session::anonymous());
        };

        match self.users.get(user_id).await? {
            Some(user) => Ok(Session::authenticated(user)),
            None => Ok(Session::anonymous()),
        }
    }

    /// Directory listing for the admin users page.
    pub async fn list_users(&self, session: &Session) -> ServiceResult<Vec<User>> {
        session.require_admin()?;
        Ok(self.users.list().await?)
    }

    async fn open_session(&self, user_id: UserId) -> ServiceResult<SessionToken> {
        let token = SessionToken::new();
        self.sessions.insert(token, user_id).await?;
        Ok(token)
    }
}
