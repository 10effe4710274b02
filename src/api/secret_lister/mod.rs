pub mod handler;
pub mod routes;

pub use routes::secret_lister_routes;
