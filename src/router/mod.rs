//! # Router Module
//!
//! Path matching for the effective routes produced by
//! [`enumerate_operations`](crate::spec::enumerate_operations).
//!
//! ## Overview
//!
//! Effective routes use colon captures (`/articles/:slug`). At startup every
//! route is compiled into an anchored regex; each incoming request is tested
//! against the table until a route with the same method matches, and the
//! captured segments are returned percent-decoded.
//!
//! ## Example
//!
//! ```rust,ignore
//! use oasgate::router::Router;
//! use oasgate::spec::load_spec;
//!
//! let (_doc, routes) = load_spec("openapi.yaml")?;
//! let router = Router::new(routes);
//!
//! if let Some(m) = router.route(http::Method::GET, "/articles/hello-world") {
//!     println!("Route: {}", m.route.route);
//!     println!("Path params: {:?}", m.path_params);
//! }
//! ```
//!
//! ## Match Order
//!
//! Deeper routes are tried first; at equal depth, routes with fewer captures
//! are tried first. Matching is linear in the number of routes.

mod core;
#[cfg(test)]
mod tests;

pub use core::{RouteMatch, Router};
