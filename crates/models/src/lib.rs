pub mod errors;
pub mod db;
pub mod password;
pub mod record;
pub mod role;
pub mod todo;
pub mod user;

pub use record::{RecordEntity, Stamp};
pub use role::Role;
