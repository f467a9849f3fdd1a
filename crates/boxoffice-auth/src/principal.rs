//! Resolve bearer tokens to users.

use std::sync::Arc;

use tracing::debug;

use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_database::store::BookingStore;
use boxoffice_entity::user::User;

use crate::jwt::decoder::JwtDecoder;

/// Turns a bearer token into the user it was issued to.
#[derive(Debug, Clone)]
pub struct PrincipalResolver {
    decoder: JwtDecoder,
    store: Arc<dyn BookingStore>,
}

impl PrincipalResolver {
    /// Creates a resolver over the given decoder and store.
    pub fn new(decoder: JwtDecoder, store: Arc<dyn BookingStore>) -> Self {
        Self { decoder, store }
    }

    /// Validates the token and looks its subject up.
    pub async fn resolve(&self, token: &str) -> AppResult<User> {
        let claims = self.decoder.decode(token)?;
        match self.store.find_user_by_email(claims.email()).await? {
            Some(user) => Ok(user),
            None => {
                debug!(email = claims.email(), "Token subject has no user");
                Err(AppError::authentication("Could not validate credentials"))
            }
        }
    }

    /// Extracts the token from an `Authorization` header value.
    pub fn bearer_token(header: &str) -> AppResult<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid authorization header format"))
    }
}
