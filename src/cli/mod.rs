//! # CLI Module
//!
//! Command line for the `oasgate` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! oasgate serve --spec openapi.yaml --port 3000
//! ```
//!
//! Loads the document, registers every operation behind its validation gate
//! and listens until killed. `PORT` is honoured when `--port` is absent.
//! `--no-cors` turns off the permissive CORS policy.
//!
//! ### `routes`
//!
//! ```bash
//! oasgate routes --spec openapi.yaml
//! ```
//!
//! Prints each effective route, its handler key, and whether a registered
//! handler or the echo fallback serves it.
//!
//! ### `check`
//!
//! ```bash
//! oasgate check --spec openapi.yaml
//! ```
//!
//! Loads, resolves, enumerates and compiles without binding a socket. Exits
//! non-zero on any document error.

mod commands;


pub use commands::{format_routes, run_cli, run_command, Cli, Commands};
