use super::core::{HandlerRequest, HandlerResponse};
use crate::echo::echo_handler;
use crate::spec::{RouteMeta, Verb};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A business handler. The worker coroutine sends whatever it returns.
pub type Handler = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Where a route's handler was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSource {
    Registry,
    Echo,
}

/// Name a handler unit exports for a verb.
///
/// `delete` is exported as `remove`, the way unit authors cannot name a
/// function after the reserved word.
pub fn export_name(verb: Verb) -> &'static str {
    verb.export_name()
}

/// Handlers for one handler key, indexed by export name.
#[derive(Clone, Default)]
pub struct HandlerUnit {
    exports: HashMap<String, Handler>,
}

impl HandlerUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style export, e.g. `HandlerUnit::new().export("get", f)`.
    pub fn export<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        self.exports.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Export under the conventional name for `verb`.
    pub fn export_verb<F>(self, verb: Verb, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        self.export(export_name(verb), handler)
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.exports.get(name)
    }
}

/// Explicit table of handler units, keyed by bracketed route
/// (`/articles/[slug]/comments/[id]`).
///
/// Filled in by the embedding application before the dispatcher is built.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    units: HashMap<String, HandlerUnit>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the unit at `key`.
    pub fn insert(&mut self, key: impl Into<String>, unit: HandlerUnit) -> &mut Self {
        self.units.insert(key.into(), unit);
        self
    }

    pub fn with_unit(mut self, key: impl Into<String>, unit: HandlerUnit) -> Self {
        self.insert(key, unit);
        self
    }

    pub fn unit(&self, key: &str) -> Option<&HandlerUnit> {
        self.units.get(key)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn echo() -> Handler {
    Arc::new(echo_handler)
}

/// Pick the handler for a route, falling back to echo.
///
/// A missing unit or a unit without the verb's export is an ordinary
/// case; it is logged at debug level and never reported as an error.
pub fn resolve_handler(registry: &HandlerRegistry, route: &RouteMeta) -> (Handler, HandlerSource) {
    let export = export_name(route.verb);
    match registry.unit(&route.handler_key) {
        Some(unit) => match unit.get(export) {
            Some(handler) => {
                debug!(handler_key = %route.handler_key, export, "Resolved handler");
                (Arc::clone(handler), HandlerSource::Registry)
            }
            None => {
                debug!(
                    handler_key = %route.handler_key,
                    export,
                    "Handler unit has no export for verb, using echo"
                );
                (echo(), HandlerSource::Echo)
            }
        },
        None => {
            debug!(handler_key = %route.handler_key, "No handler unit, using echo");
            (echo(), HandlerSource::Echo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{enumerate_operations, parse_document};
    use serde_json::json;

    fn comment_routes() -> Vec<RouteMeta> {
        let doc = json!({
            "paths": {
                "/articles/{slug}/comments/{id}": { "delete": {}, "get": {} }
            }
        });
        enumerate_operations(&parse_document(&doc).unwrap())
    }

    #[test]
    fn test_export_name() {
        assert_eq!(export_name(Verb::Get), "get");
        assert_eq!(export_name(Verb::Delete), "remove");
    }

    #[test]
    fn test_delete_resolves_remove_export() {
        let registry = HandlerRegistry::new().with_unit(
            "/articles/[slug]/comments/[id]",
            HandlerUnit::new().export("remove", |_req| HandlerResponse::json(204, json!(null))),
        );
        let routes = comment_routes();
        let delete = routes.iter().find(|r| r.verb == Verb::Delete).unwrap();
        let (_, source) = resolve_handler(&registry, delete);
        assert_eq!(source, HandlerSource::Registry);

        let get = routes.iter().find(|r| r.verb == Verb::Get).unwrap();
        let (_, source) = resolve_handler(&registry, get);
        assert_eq!(source, HandlerSource::Echo);
    }

    #[test]
    fn test_export_named_delete_is_not_used() {
        let registry = HandlerRegistry::new().with_unit(
            "/articles/[slug]/comments/[id]",
            HandlerUnit::new().export("delete", |_req| HandlerResponse::json(204, json!(null))),
        );
        let routes = comment_routes();
        let delete = routes.iter().find(|r| r.verb == Verb::Delete).unwrap();
        assert_eq!(resolve_handler(&registry, delete).1, HandlerSource::Echo);
    }

    #[test]
    fn test_missing_unit_falls_back_to_echo() {
        let registry = HandlerRegistry::new();
        for route in comment_routes() {
            assert_eq!(resolve_handler(&registry, &route).1, HandlerSource::Echo);
        }
    }
}
