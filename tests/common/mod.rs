#![allow(dead_code)]

use oasgate::dispatcher::{HandlerRegistry, HandlerResponse, HandlerUnit};
use oasgate::server::{AppService, HttpServer, ServerHandle};
use oasgate::spec::{load_spec_from_value, RouteMeta};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Once;
use std::time::Duration;

static MAY_INIT: Once = Once::new();

/// Configure may coroutines once per test binary.
pub fn setup_may_runtime() {
    MAY_INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
    });
}

/// A small blog API exercising bodies, refs and path parameters.
pub fn blog_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": { "title": "Blog", "version": "1.0.0" },
        "paths": {
            "/articles": {
                "summary": "Articles",
                "post": {
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/NewArticle" }
                            }
                        }
                    }
                }
            },
            "/articles/{slug}": {
                "get": {
                    "parameters": [{ "$ref": "#/components/parameters/Slug" }]
                }
            },
            "/articles/{slug}/comments/{id}": {
                "delete": {
                    "parameters": [
                        { "$ref": "#/components/parameters/Slug" },
                        { "name": "id", "in": "path", "schema": { "type": "integer" } }
                    ]
                }
            }
        },
        "components": {
            "parameters": {
                "Slug": { "name": "slug", "in": "path", "schema": { "type": "string" } }
            },
            "schemas": {
                "NewArticle": {
                    "type": "object",
                    "required": ["article"],
                    "properties": {
                        "article": {
                            "type": "object",
                            "required": ["title"],
                            "properties": {
                                "title": { "type": "string" },
                                "publishedAt": { "type": "string", "format": "date-time" },
                                "tags": { "type": "array", "items": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn blog_routes() -> Vec<RouteMeta> {
    load_spec_from_value(&blog_document()).unwrap().1
}

/// Custom `remove` for the comment route; everything else echoes.
pub fn blog_registry() -> HandlerRegistry {
    HandlerRegistry::new().with_unit(
        "/articles/[slug]/comments/[id]",
        HandlerUnit::new().export("remove", |req| {
            HandlerResponse::json(
                200,
                json!({
                    "deleted": req.get_path_param("id"),
                    "article": req.get_path_param("slug"),
                }),
            )
        }),
    )
}

/// Server on a free local port, stopped on drop.
pub struct TestServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl TestServer {
    pub fn start(routes: Vec<RouteMeta>, registry: &HandlerRegistry) -> Self {
        setup_may_runtime();
        let service = AppService::from_routes(routes, registry, true).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        Self {
            handle: Some(handle),
            addr,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn request(&self, raw: &str) -> (u16, Vec<(String, String)>, String) {
        parse_response(&send_request(&self.addr, raw))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

/// Send a raw HTTP/1.1 request and read one response.
pub fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(1000)))
        .unwrap();

    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&tmp[..n]);
                if response_complete(&buf) {
                    break;
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn response_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    body.len() >= length
}

/// Status, headers and body of a raw response.
pub fn parse_response(resp: &str) -> (u16, Vec<(String, String)>, String) {
    let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    (status, headers, body.to_string())
}

pub fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

pub fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// `POST`-style request with an optional content type and a body.
pub fn request_with_body(
    method: &str,
    path: &str,
    content_type: Option<&str>,
    body: &str,
) -> String {
    let ct = content_type
        .map(|ct| format!("Content-Type: {ct}\r\n"))
        .unwrap_or_default();
    format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\n{ct}Content-Length: {}\r\n\r\n{body}",
        body.len()
    )
}
