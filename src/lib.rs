//! # oasgate
//!
//! **oasgate** serves an API description document (OpenAPI-style `servers`
//! and `paths`) as a live HTTP surface on the `may` coroutine runtime. Every
//! declared operation gets a route; every request is checked against the
//! declared schemas before any business handler runs.
//!
//! ## Architecture
//!
//! - **[`spec`]** - document loading, `$ref` resolution and operation enumeration
//! - **[`schema`]** - schema model and the compiled structural validator
//! - **[`validator`]** - the per-operation request gate and startup issue reporting
//! - **[`router`]** - effective route table and path matching
//! - **[`dispatcher`]** - handler registry, echo fallback and handler coroutines
//! - **[`middleware`]** - tracing and CORS hooks around dispatch
//! - **[`server`]** - `may_minihttp` service and server lifecycle
//! - **[`config`]**, **[`logging`]**, **[`cli`]** - runtime settings, log output, command line
//!
//! ## Startup
//!
//! ```text
//! load_document → resolve_document → parse_document → enumerate_operations
//!     → Router::new + Dispatcher::from_routes → HttpServer::start
//! ```
//!
//! Any document error aborts startup before a route is registered.
//!
//! ## Request Flow
//!
//! ```text
//! parse → /health? → Router::route (404) → middleware before
//!     → RequestValidator (400 {errors, status}) → handler coroutine → middleware after
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oasgate::dispatcher::{HandlerRegistry, HandlerResponse, HandlerUnit};
//! use oasgate::server::{AppService, HttpServer};
//! use oasgate::spec::load_spec;
//! use serde_json::json;
//!
//! let (_doc, routes) = load_spec("openapi.yaml")?;
//! let registry = HandlerRegistry::new().with_unit(
//!     "/articles/[slug]",
//!     HandlerUnit::new().export("get", |req| {
//!         HandlerResponse::json(200, json!({ "slug": req.get_path_param("slug") }))
//!     }),
//! );
//! let service = AppService::from_routes(routes, &registry, true)?;
//! HttpServer(service).start("0.0.0.0:8080")?.join().ok();
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod schema;
pub mod server;
pub mod spec;
pub mod validator;

pub use spec::{load_spec, SpecError};
