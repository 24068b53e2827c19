//! # Schema Module
//!
//! Structural validation of JSON values against the schema subset the gate
//! understands: `type` (single or list), `format: date-time`, `multipleOf`,
//! `properties`, `required` and `items`.
//!
//! [`Schema::parse`] checks a resolved schema node once at startup;
//! [`compile_schema`] binds it to a label and produces a [`CompiledSchema`]
//! that request handling reuses.
//!
//! ```
//! use oasgate::schema::{compile_schema, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::parse(&json!({ "type": "integer", "multipleOf": 5 }), "body").unwrap();
//! let validator = compile_schema(&schema, "body");
//! assert!(validator.validate(&json!(10)).is_empty());
//! assert_eq!(validator.validate(&json!(7)), vec!["body must be a multiple of 5."]);
//! ```

mod compile;
mod datetime;
mod types;

pub use compile::{compile_schema, CompiledSchema};
pub use datetime::is_date_time;
pub use types::{Schema, SchemaType, TypeSet};
