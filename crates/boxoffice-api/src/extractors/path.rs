//! Typed path parameter helpers.

use std::str::FromStr;

use boxoffice_core::error::AppError;

/// Parses a numeric identifier from a path segment.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid identifier: {raw}")))
}
