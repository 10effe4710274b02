pub mod client;

pub use client::{SecretClient, SecretProperties};
