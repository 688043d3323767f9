pub mod browse;
pub mod cloud;
pub mod cooldown;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod search;
pub mod transfers;

pub use routes::create_router;

use serde::Serialize;

/// Error body shared by every endpoint: `{ "error": <message> }`.
///
/// Remote-service messages are forwarded verbatim; the frontend renders
/// this string inline.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
