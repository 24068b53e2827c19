use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::{Dispatcher, HandlerRegistry};
use crate::middleware::{CorsMiddleware, Middleware, TracingMiddleware};
use crate::router::Router;
use crate::spec::RouteMeta;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

/// The `may_minihttp` service: routes, gates and dispatches each request.
///
/// Router and dispatcher are immutable after startup, so clones share them
/// without locking.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
    /// Answers preflights for paths without a declared `options` operation.
    pub cors: Option<Arc<CorsMiddleware>>,
}

impl AppService {
    pub fn new(router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            router,
            dispatcher,
            cors: None,
        }
    }

    pub fn with_cors(mut self, cors: Arc<CorsMiddleware>) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Router, dispatcher and default middleware for a set of routes.
    ///
    /// Tracing is always installed; permissive CORS when `cors` is set.
    pub fn from_routes(
        routes: Vec<RouteMeta>,
        registry: &HandlerRegistry,
        cors: bool,
    ) -> io::Result<Self> {
        let mut dispatcher = Dispatcher::from_routes(&routes, registry)?;
        dispatcher.add_middleware(Arc::new(TracingMiddleware));
        let cors_mw = cors.then(|| Arc::new(CorsMiddleware::default()));
        if let Some(mw) = &cors_mw {
            dispatcher.add_middleware(Arc::clone(mw) as Arc<dyn Middleware>);
        }
        let service = AppService::new(Arc::new(Router::new(routes)), Arc::new(dispatcher));
        Ok(match cors_mw {
            Some(mw) => service.with_cors(mw),
            None => service,
        })
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: application/json");
    res.body_vec(json!({ "status": "ok" }).to_string().into_bytes());
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            body,
        } = parse_request(req);

        if method == "GET" && path == "/health" {
            return health_endpoint(res);
        }

        let Ok(parsed_method) = method.parse::<Method>() else {
            warn!(method = %method, "Unparseable request method");
            write_json_error(res, 400, json!({ "error": "Bad Request", "method": method }));
            return Ok(());
        };

        let Some(mut route_match) = self.router.route(parsed_method.clone(), &path) else {
            if parsed_method == Method::OPTIONS {
                if let Some(cors) = &self.cors {
                    debug!(path = %path, "Answering CORS preflight");
                    write_handler_response(res, &cors.preflight_response());
                    return Ok(());
                }
            }
            write_json_error(
                res,
                404,
                json!({ "error": "Not Found", "method": method, "path": path }),
            );
            return Ok(());
        };
        route_match.query_params = query_params;

        match self.dispatcher.dispatch(route_match, body, headers, &path) {
            Some(hr) => write_handler_response(res, &hr),
            None => write_json_error(
                res,
                500,
                json!({
                    "error": "Handler failed or not registered",
                    "method": method,
                    "path": path
                }),
            ),
        }
        Ok(())
    }
}
