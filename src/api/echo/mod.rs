pub mod handler;
pub mod routes;

pub use routes::echo_routes;
