pub mod handler;
pub mod routes;

pub use routes::token_validator_routes;
