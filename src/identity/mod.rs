/*
* Managed identity: token sources, the credential built on them, and the
* token response model.
*/

pub mod credential;
pub mod token;

pub use credential::{IdentitySource, ManagedIdentityCredential};
pub use token::{TokenCheck, TokenResponse};

// Ambient variables the hosting platform sets for managed identity
pub const IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
pub const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
pub const IDENTITY_SERVER_THUMBPRINT: &str = "IDENTITY_SERVER_THUMBPRINT";
