//! HTTP transport on `may_minihttp`.
//!
//! [`AppService`] parses each request, answers `/health`, matches the route
//! and hands the rest to the [`Dispatcher`](crate::dispatcher::Dispatcher).
//! [`HttpServer`] binds it to an address and returns a [`ServerHandle`].

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_json_body, parse_query_params, parse_request, ParsedRequest};
pub use response::{write_handler_response, write_json_error};
pub use service::{health_endpoint, AppService};
