//! User entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use boxoffice_core::types::id::UserId;

/// A registered user. Only the fields needed to resolve a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login e-mail, carried as the `sub` claim of bearer tokens.
    pub email: String,
}
