//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login, bearer token issue/verification and role checks live here, independent of
//! the web framework. `token` holds the JWT codec shared with the HTTP middleware.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use errors::AuthError;
pub use service::AuthService;
pub use token::{Claims, TokenCodec};
