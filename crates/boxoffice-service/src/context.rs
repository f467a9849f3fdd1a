//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boxoffice_core::types::id::UserId;
use boxoffice_entity::user::User;

/// Context for the current authenticated request.
///
/// Built by the transport layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's login e-mail.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            request_time: Utc::now(),
        }
    }

    /// Value stored as the owner of this principal's seat locks.
    pub fn lock_owner(&self) -> String {
        self.user_id.lock_owner()
    }
}

impl From<User> for RequestContext {
    fn from(user: User) -> Self {
        Self::new(user.id, user.email)
    }
}
