// Start of file: /src/utils/mod.rs

/*
    * Error mapping and response logging shared by both services.
*/

pub mod error_handler;
pub mod response_handler;

// End of file: /src/utils/mod.rs
