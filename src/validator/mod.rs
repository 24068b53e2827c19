//! # Validator Module
//!
//! Two kinds of validation live here:
//!
//! - **Startup issues** ([`ValidationIssue`], [`print_issues`]) describe why a
//!   description document was refused. They are fatal.
//! - **Request validation** ([`RequestValidator`]) is the per-route gate that
//!   runs before a handler. Its errors are collected, never short-circuited,
//!   and answered with `400 { "errors": [...], "status": 400 }`.

mod issues;
mod request;

pub use issues::{format_issues, print_issues, ValidationIssue};
pub use request::{decode_path_value, RequestParts, RequestValidator, MISSING_CONTENT_TYPE};
