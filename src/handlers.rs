//! Handler units bundled with the binary.
//!
//! Embedding applications build their own [`HandlerRegistry`]; the `oasgate`
//! binary serves with [`builtin_registry`], so every other route answers
//! with the echo handler.

use crate::dispatcher::{HandlerRegistry, HandlerRequest, HandlerResponse, HandlerUnit};
use crate::spec::Verb;
use serde_json::json;

/// `/articles/[slug]/comments/[id]`
pub mod article_comment {
    use super::*;

    pub const KEY: &str = "/articles/[slug]/comments/[id]";

    /// Reports what would be deleted.
    pub fn remove(req: &HandlerRequest) -> HandlerResponse {
        HandlerResponse::json(
            200,
            json!({
                "url": req.path,
                "method": req.method.as_str(),
                "params": req.path_params,
            }),
        )
    }

    pub fn unit() -> HandlerUnit {
        HandlerUnit::new().export_verb(Verb::Delete, remove)
    }
}

pub fn builtin_registry() -> HandlerRegistry {
    HandlerRegistry::new().with_unit(article_comment::KEY, article_comment::unit())
}
