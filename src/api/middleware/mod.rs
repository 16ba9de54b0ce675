//! Middleware components for request processing.
//!
//! Tower middleware for logging, request ID tracking and error
//! normalization, plus the route-level actor middleware used by the
//! posts handler.

mod actor;
mod error_handler;
mod logging;
mod request_id;

pub use actor::{ACTOR_HEADER, actor_middleware};
pub use error_handler::global_error_handler;
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
