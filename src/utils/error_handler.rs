// Global error handling for handlers and HTTP middleware layers

use axum::{
    BoxError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error;
// tower's error type for timeouts
use tower::timeout::error::Elapsed;
use tracing::error;

/// A fault a handler could not turn into a reported outcome.
///
/// Renders as a bare 500: the caller only learns the check could not be
/// completed. The full error chain goes to the log.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Unhandled error: {:#}", self.0);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Maps layer errors to bare status responses
pub async fn handle_global_error(err: BoxError) -> StatusCode {
    // 408 if the request took too long
    if err.is::<Elapsed>() || find_cause::<Elapsed>(&*err).is_some() {
        return StatusCode::REQUEST_TIMEOUT;
    }

    error!("Unhandled middleware error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Helper function to find specific error type in error chain
pub fn find_cause<T: Error + 'static>(err: &dyn Error) -> Option<&T> {
    let mut source: Option<&dyn Error> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}
