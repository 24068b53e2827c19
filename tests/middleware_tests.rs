mod common;

use common::{blog_registry, blog_routes, setup_may_runtime};
use http::Method;
use oasgate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use oasgate::middleware::{CorsMiddleware, Middleware, TracingMiddleware};
use oasgate::router::Router;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Counter {
    before: AtomicUsize,
    after: AtomicUsize,
    last_status: AtomicUsize,
}

impl Middleware for Counter {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        self.before.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        self.after.fetch_add(1, Ordering::SeqCst);
        self.last_status.store(res.status as usize, Ordering::SeqCst);
    }
}

fn dispatcher_with(middlewares: Vec<Arc<dyn Middleware>>) -> (Router, Dispatcher) {
    setup_may_runtime();
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::from_routes(&routes, &blog_registry()).unwrap();
    for mw in middlewares {
        dispatcher.add_middleware(mw);
    }
    (Router::new(routes), dispatcher)
}

#[test]
fn test_after_sees_gate_rejections() {
    let counter = Arc::new(Counter::default());
    let (router, dispatcher) = dispatcher_with(vec![Arc::clone(&counter) as Arc<dyn Middleware>]);

    let m = router.route(Method::POST, "/articles").unwrap();
    let resp = dispatcher.dispatch(m, None, HashMap::new(), "/articles").unwrap();
    assert_eq!(resp.status, 400);
    assert_eq!(counter.before.load(Ordering::SeqCst), 1);
    assert_eq!(counter.after.load(Ordering::SeqCst), 1);
    assert_eq!(counter.last_status.load(Ordering::SeqCst), 400);
}

#[test]
fn test_cors_headers_on_handler_response() {
    let (router, dispatcher) = dispatcher_with(vec![Arc::new(CorsMiddleware::default()) as Arc<dyn Middleware>]);
    let m = router.route(Method::GET, "/articles/x").unwrap();
    let resp = dispatcher.dispatch(m, None, HashMap::new(), "/articles/x").unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.get_header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(resp.get_header("content-type"), Some("application/json"));
}

#[test]
fn test_custom_cors_policy() {
    let cors = CorsMiddleware::new(
        vec!["https://blog.example.com".into()],
        vec!["Content-Type".into()],
        vec![Method::GET],
    );
    let (router, dispatcher) = dispatcher_with(vec![Arc::new(cors) as Arc<dyn Middleware>]);
    let m = router.route(Method::GET, "/articles/x").unwrap();
    let resp = dispatcher.dispatch(m, None, HashMap::new(), "/articles/x").unwrap();
    assert_eq!(
        resp.get_header("access-control-allow-origin"),
        Some("https://blog.example.com")
    );
    assert_eq!(resp.get_header("access-control-allow-methods"), Some("GET"));
}

#[test]
fn test_tracing_middleware_logs_completion() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let (router, dispatcher) = dispatcher_with(vec![Arc::new(TracingMiddleware) as Arc<dyn Middleware>]);
    tracing::subscriber::with_default(subscriber, || {
        let m = router.route(Method::GET, "/articles/traced").unwrap();
        let resp = dispatcher
            .dispatch(m, None, HashMap::new(), "/articles/traced")
            .unwrap();
        assert_eq!(resp.status, 200);
    });

    let text = logs.text();
    assert!(text.contains("Request completed"), "logs: {text}");
    assert!(text.contains("status=200"), "logs: {text}");
    assert!(text.contains("/articles/traced"), "logs: {text}");
}
