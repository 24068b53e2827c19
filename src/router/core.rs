use crate::spec::RouteMeta;
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

static CAPTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\w+)").expect("capture regex should be valid"));

/// Result of successfully matching a request path to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (shared, cloning is cheap).
    pub route: Arc<RouteMeta>,
    /// Percent-decoded captures, e.g. `:slug` → `{"slug": "hello-world"}`.
    pub path_params: HashMap<String, String>,
    /// Query string parameters, filled in by the server.
    pub query_params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}

/// Static route table built from enumerated operations.
///
/// Immutable once built; share it behind an `Arc` between connections.
#[derive(Clone, Default)]
pub struct Router {
    /// method, compiled regex, meta, capture names
    routes: Vec<(Method, Regex, Arc<RouteMeta>, Vec<String>)>,
}

impl Router {
    /// Compile a route table.
    ///
    /// Routes with more segments are tried first, and among routes of equal
    /// depth the one with fewer captures wins, so `/articles/feed` is
    /// preferred over `/articles/:slug`. Routes whose pattern cannot be
    /// compiled are skipped.
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        let mut routes: Vec<_> = routes
            .into_iter()
            .filter_map(|route| {
                let (regex, param_names) = Self::path_to_regex(&route.route)?;
                Some((route.method(), regex, Arc::new(route), param_names))
            })
            .collect();
        routes.sort_by_key(|(_, _, meta, params)| {
            let depth = meta.route.split('/').filter(|s| !s.is_empty()).count();
            (std::cmp::Reverse(depth), params.len())
        });

        info!(routes_count = routes.len(), "Routing table loaded");
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every route in match order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<RouteMeta>> {
        self.routes.iter().map(|(_, _, meta, _)| meta)
    }

    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        for (m, regex, route, param_names) in &self.routes {
            if *m != method {
                continue;
            }
            if let Some(captures) = regex.captures(path) {
                let mut params = HashMap::with_capacity(param_names.len());
                for (i, name) in param_names.iter().enumerate() {
                    if let Some(val) = captures.get(i + 1) {
                        let decoded = urlencoding::decode(val.as_str())
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| val.as_str().to_string());
                        params.insert(name.clone(), decoded);
                    }
                }
                debug!(method = %method, path = %path, route = %route.route, "Route matched");
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    path_params: params,
                    query_params: HashMap::new(),
                });
            }
        }
        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Compile a `:name` capture route into an anchored regex.
    ///
    /// Captures may share a segment with literal text, as in `/files/:name.json`.
    /// A single trailing slash on the request path is tolerated.
    pub(crate) fn path_to_regex(route: &str) -> Option<(Regex, Vec<String>)> {
        if route.is_empty() || route == "/" {
            return Regex::new(r"^/$").ok().map(|re| (re, Vec::new()));
        }

        let mut pattern = String::with_capacity(route.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(route.matches(':').count());

        for segment in route.split('/').filter(|s| !s.is_empty()) {
            pattern.push('/');
            let mut last = 0;
            for caps in CAPTURE.captures_iter(segment) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                pattern.push_str(&regex::escape(&segment[last..whole.start()]));
                pattern.push_str("([^/]+?)");
                param_names.push(name.as_str().to_string());
                last = whole.end();
            }
            pattern.push_str(&regex::escape(&segment[last..]));
        }

        pattern.push_str("/?$");
        Regex::new(&pattern).ok().map(|re| (re, param_names))
    }
}
