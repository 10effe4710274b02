/*
* HTTP surfaces. `echo` is shared; each service has its own router.
*/

pub mod echo;
pub mod secret_lister;
pub mod token_validator;
