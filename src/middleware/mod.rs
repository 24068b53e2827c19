//! Request/response hooks run by the [`Dispatcher`](crate::dispatcher::Dispatcher).

mod core;
mod cors;
mod tracing;

pub use core::Middleware;
pub use cors::CorsMiddleware;
pub use tracing::TracingMiddleware;
