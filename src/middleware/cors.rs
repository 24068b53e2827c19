use std::time::Duration;

use http::Method;
use serde_json::Value;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Answers preflight `OPTIONS` requests and adds CORS headers to every
/// response. The default policy is permissive: every route of the
/// description is reachable from any origin.
pub struct CorsMiddleware {
    allowed_origins: Vec<String>,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsMiddleware {
    /// ```rust
    /// use oasgate::middleware::CorsMiddleware;
    /// use http::Method;
    ///
    /// let cors = CorsMiddleware::new(
    ///     vec!["https://example.com".to_string()],
    ///     vec!["Content-Type".to_string()],
    ///     vec![Method::GET, Method::POST],
    /// );
    /// ```
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_headers: Vec<String>,
        allowed_methods: Vec<Method>,
    ) -> Self {
        Self {
            allowed_origins,
            allowed_headers,
            allowed_methods,
        }
    }

    /// Empty 204 carrying the CORS headers.
    ///
    /// Also used by the server for preflights on paths with no declared
    /// `options` operation.
    pub fn preflight_response(&self) -> HandlerResponse {
        let mut res = HandlerResponse::new(204, Default::default(), Value::Null);
        self.apply_headers(&mut res);
        res
    }

    pub fn apply_headers(&self, res: &mut HandlerResponse) {
        res.set_header("Access-Control-Allow-Origin", self.allowed_origins.join(", "));
        res.set_header("Access-Control-Allow-Headers", self.allowed_headers.join(", "));
        let methods = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        res.set_header("Access-Control-Allow-Methods", methods);
    }
}

/// Allow all origins, the common request headers and every verb a
/// description can declare.
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            allowed_methods: vec![
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ],
        }
    }
}

impl Middleware for CorsMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        (req.method == Method::OPTIONS).then(|| self.preflight_response())
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        self.apply_headers(res);
    }
}
