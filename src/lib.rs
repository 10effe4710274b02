// Library root for the managed identity probe services

pub mod api;
pub mod config;
pub mod core;
pub mod identity;
pub mod keyvault;
pub mod utils;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::lookup::{EnvLookup, ProcessEnv, StaticEnv};
pub use crate::config::state::AppState;
pub use crate::core::server::create_app;
