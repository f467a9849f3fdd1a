//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and resolves it to a user.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use boxoffice_auth::PrincipalResolver;
use boxoffice_core::error::AppError;
use boxoffice_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;

        let token = PrincipalResolver::bearer_token(header)?;
        let user = state.principals.resolve(token).await?;

        Ok(AuthUser(RequestContext::from(user)))
    }
}
