use serde::{Deserialize, Serialize};

mod response;

pub use response::ApiResponse;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
