//! # boxoffice-auth
//!
//! Bearer token handling for BoxOffice. Tokens are issued elsewhere; this
//! crate only validates HS256 JWTs and resolves their subject to a user.

pub mod jwt;
pub mod principal;

pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use principal::PrincipalResolver;
