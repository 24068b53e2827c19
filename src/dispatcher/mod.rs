//! # Dispatcher Module
//!
//! Coroutine-based handler dispatch with a validation gate in front of
//! every handler.
//!
//! ## Overview
//!
//! For each enumerated route the dispatcher holds:
//!
//! - the operation's [`RequestValidator`](crate::validator::RequestValidator)
//! - a channel to a worker coroutine running the resolved handler
//!
//! Handlers come from an explicit [`HandlerRegistry`] built by the embedding
//! application. Routes are looked up by their bracketed handler key
//! (`/articles/[slug]/comments/[id]`) and the verb's export name; anything
//! not found is served by the [echo handler](crate::echo::echo_handler).
//!
//! ## Handler Registration
//!
//! ```rust,ignore
//! use oasgate::dispatcher::{Dispatcher, HandlerRegistry, HandlerResponse, HandlerUnit};
//! use serde_json::json;
//!
//! let registry = HandlerRegistry::new().with_unit(
//!     "/articles/[slug]/comments/[id]",
//!     HandlerUnit::new().export("remove", |req| {
//!         HandlerResponse::json(200, json!({ "deleted": req.get_path_param("id") }))
//!     }),
//! );
//! let dispatcher = Dispatcher::from_routes(&routes, &registry)?;
//! ```
//!
//! ## Request Flow
//!
//! 1. Middleware `before` hooks run; the first response returned wins
//! 2. The gate validates headers, path captures and body
//! 3. Any error short-circuits with `400 {"errors": [...], "status": 400}`
//! 4. Otherwise the request goes to the handler coroutine over a channel
//! 5. Middleware `after` hooks see every response
//!
//! Handler panics are caught in the worker and answered with a 500.

mod core;
mod registry;

pub use core::{Dispatcher, HandlerRequest, HandlerResponse, HandlerSender};
pub use registry::{
    export_name, resolve_handler, Handler, HandlerRegistry, HandlerSource, HandlerUnit,
};
