use super::registry::{resolve_handler, Handler, HandlerSource, HandlerRegistry};
use crate::middleware::Middleware;
use crate::router::RouteMatch;
use crate::spec::RouteMeta;
use crate::validator::{RequestParts, RequestValidator};
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Request data passed to a handler coroutine.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: Method,
    /// Request path as received.
    pub path: String,
    /// Effective route that matched, e.g. `/articles/:slug`.
    pub route: String,
    /// Registry key the handler was resolved from.
    pub handler_key: String,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    /// Header names are lower case.
    pub headers: HashMap<String, String>,
    /// Request body parsed as JSON (if present and parseable)
    pub body: Option<Value>,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Case-insensitive header lookup.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// View of the request for the validation gate.
    pub fn parts(&self) -> RequestParts<'_> {
        RequestParts {
            headers: &self.headers,
            path_params: &self.path_params,
            body: self.body.as_ref(),
        }
    }
}

/// Response data sent back from a handler coroutine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl HandlerResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type` header.
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Rejection produced by the validation gate.
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::json(400, json!({ "errors": errors, "status": 400 }))
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    ///
    /// The server caches each distinct header line for the life of the
    /// process, so prefer a small set of fixed values.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }
}

pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Everything registered for one `(method, route)` pair.
struct RouteEntry {
    gate: RequestValidator,
    sender: HandlerSender,
    source: HandlerSource,
}

/// Routes matched requests through the validation gate to handler coroutines.
///
/// Built once at startup and read-only afterwards; share it behind an `Arc`.
#[derive(Default)]
pub struct Dispatcher {
    routes: HashMap<(Method, String), RouteEntry>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every enumerated route, resolving handlers from `registry`.
    ///
    /// Fails only if a handler coroutine cannot be spawned.
    pub fn from_routes(routes: &[RouteMeta], registry: &HandlerRegistry) -> io::Result<Self> {
        let mut dispatcher = Self::new();
        dispatcher.register_routes(routes, registry)?;
        Ok(dispatcher)
    }

    pub fn register_routes(
        &mut self,
        routes: &[RouteMeta],
        registry: &HandlerRegistry,
    ) -> io::Result<()> {
        for route in routes {
            let (handler, source) = resolve_handler(registry, route);
            self.register_handler(route, handler, source)?;
        }
        info!(
            routes = self.routes.len(),
            custom = self
                .routes
                .values()
                .filter(|e| e.source == HandlerSource::Registry)
                .count(),
            "Dispatcher ready"
        );
        Ok(())
    }

    /// Middleware runs in the order it was added.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Where the handler for `(method, route)` came from, if registered.
    pub fn handler_source(&self, method: &Method, route: &str) -> Option<HandlerSource> {
        self.routes
            .get(&(method.clone(), route.to_string()))
            .map(|e| e.source)
    }

    /// Install the gate and spawn a worker coroutine for one route.
    ///
    /// Registering the same `(method, route)` twice replaces the earlier
    /// entry; the old worker exits once its channel closes.
    pub fn register_handler(
        &mut self,
        route: &RouteMeta,
        handler: Handler,
        source: HandlerSource,
    ) -> io::Result<()> {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let worker_name = format!("{} {}", route.verb, route.route);
        let stack_size = may::config().get_stack_size();

        // SAFETY: the closure owns everything it touches and never accesses
        // thread-local state, which is what may requires of spawned coroutines.
        #[allow(unsafe_code)]
        let spawned = unsafe {
            coroutine::Builder::new()
                .name(worker_name.clone())
                .stack_size(stack_size)
                .spawn(move || {
                    for req in rx.iter() {
                        let reply_tx = req.reply_tx.clone();
                        let handler_key = req.handler_key.clone();
                        let response = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
                            || handler(&req),
                        ))
                        .unwrap_or_else(|panic| {
                            let message = panic_message(&*panic);
                            error!(
                                handler_key = %handler_key,
                                panic_message = %message,
                                "Handler panicked"
                            );
                            HandlerResponse::error(500, &format!("Handler panicked: {message}"))
                        });
                        if reply_tx.send(response).is_err() {
                            debug!(handler_key = %handler_key, "Reply channel closed");
                        }
                    }
                })
        };
        if let Err(e) = spawned {
            error!(worker = %worker_name, error = %e, "Failed to spawn handler coroutine");
            return Err(e);
        }

        let gate = RequestValidator::for_operation(&route.operation);
        let key = (route.method(), route.route.clone());
        if self.routes.contains_key(&key) {
            warn!(worker = %worker_name, "Replaced existing handler");
        }
        info!(
            worker = %worker_name,
            handler_key = %route.handler_key,
            source = ?source,
            gate = !gate.is_noop(),
            "Handler registered"
        );
        self.routes.insert(
            key,
            RouteEntry {
                gate,
                sender: tx,
                source,
            },
        );
        Ok(())
    }

    /// Run one matched request through middleware, the gate and its handler.
    ///
    /// Returns `None` when nothing is registered for the matched route.
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        body: Option<Value>,
        headers: HashMap<String, String>,
        path: &str,
    ) -> Option<HandlerResponse> {
        let meta = Arc::clone(&route_match.route);
        let method = meta.method();
        let Some(entry) = self.routes.get(&(method.clone(), meta.route.clone())) else {
            error!(method = %method, route = %meta.route, "No handler registered for route");
            return None;
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let request = HandlerRequest {
            method,
            path: path.to_string(),
            route: meta.route.clone(),
            handler_key: meta.handler_key.clone(),
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            body,
            reply_tx,
        };

        let early = self
            .middlewares
            .iter()
            .fold(None, |early, mw| early.or_else(|| mw.before(&request)));

        let start = Instant::now();
        let mut response = match early {
            Some(resp) => resp,
            None => {
                let errors = entry.gate.validate(&request.parts());
                if !errors.is_empty() {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        errors = ?errors,
                        "Request rejected by validation"
                    );
                    HandlerResponse::validation_failed(errors)
                } else {
                    Self::call_worker(&entry.sender, &request, &reply_rx)
                }
            }
        };
        let latency: Duration = start.elapsed();

        for mw in &self.middlewares {
            mw.after(&request, &mut response, latency);
        }
        Some(response)
    }

    fn call_worker(
        sender: &HandlerSender,
        request: &HandlerRequest,
        reply_rx: &mpsc::Receiver<HandlerResponse>,
    ) -> HandlerResponse {
        if let Err(e) = sender.send(request.clone()) {
            error!(route = %request.route, error = %e, "Failed to send request to handler");
            return HandlerResponse::error(503, "Handler is not available");
        }
        match reply_rx.recv() {
            Ok(response) => response,
            Err(e) => {
                error!(route = %request.route, error = %e, "Handler channel closed");
                HandlerResponse::error(503, "Handler is not responding")
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
