//! Service layer: generic record operations and the login flow on top of `models`.
//! - `records` works for any entity implementing `models::RecordEntity`.
//! - `auth` keeps the same domain / repository / service split for credentials and tokens.

pub mod errors;
pub mod auth;
pub mod pagination;
pub mod records;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::PageQuery;
pub use records::RecordService;
