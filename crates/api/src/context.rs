use cradle_auth::{Session, SessionToken};

/// Session context for a request, injected by the session middleware.
///
/// Carries the resolved session plus the raw token so sign-out can revoke
/// exactly the credential the request presented.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn new(session: Session, token: Option<SessionToken>) -> Self {
        Self { session, token }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
    }
}
