//! # Spec Module
//!
//! Turns a description document into the routes the gate serves.
//!
//! 1. [`load_document`] reads YAML or JSON into a tree.
//! 2. [`resolve_document`] expands every local `$ref`.
//! 3. [`parse_document`] builds the typed [`Document`], rejecting path item
//!    fields it does not understand.
//! 4. [`enumerate_operations`] emits one [`RouteMeta`] per operation per
//!    server, with the route already translated to `:name` capture syntax.
//!
//! All four happen once at startup. Any [`SpecError`] aborts startup before a
//! single route is registered.

mod build;
mod error;
mod load;
mod resolve;
mod types;

pub use build::{
    base_path_of, enumerate_operations, handler_key_to_route, parse_document, parse_path_item,
    route_to_handler_key, translate_route, PATH_ITEM_METADATA,
};
pub use error::SpecError;
pub use load::{load_document, load_spec, load_spec_from_value};
pub use resolve::{resolve_document, resolve_pointer, resolve_value};
pub use types::{
    Document, MediaType, Operation, ParameterLocation, ParameterMeta, PathItem, RequestBody,
    RouteMeta, Server, Verb,
};
