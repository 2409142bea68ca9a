//! Caller identity
//!
//! Authentication happens upstream; requests arrive with the tenant, and optionally the user
//! and guest session, as headers.

use crate::uuids::TypedUuid;

/// Header carrying the tenant identifier.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Header carrying the authenticated user identifier.
pub const USER_HEADER: &str = "X-User-ID";

/// Header carrying the guest session identifier.
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Authenticated shopper.
#[derive(Debug, Clone, Copy)]
pub struct User;

/// Anonymous browsing session.
#[derive(Debug, Clone, Copy)]
pub struct Session;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Session UUID
pub type SessionUuid = TypedUuid<Session>;

/// Who is acting on a cart: a user, a guest session, or a user who still carries the session
/// they browsed with before logging in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity {
    /// Authenticated user, if logged in.
    pub user: Option<UserUuid>,

    /// Guest session, if any.
    pub session: Option<SessionUuid>,
}

impl Identity {
    /// Identity of a logged-in user without a guest session.
    #[must_use]
    pub fn user(user: UserUuid) -> Self {
        Self {
            user: Some(user),
            session: None,
        }
    }

    /// Identity of an anonymous guest.
    #[must_use]
    pub fn guest(session: SessionUuid) -> Self {
        Self {
            user: None,
            session: Some(session),
        }
    }

    /// Whether neither a user nor a session is known.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none() && self.session.is_none()
    }
}
