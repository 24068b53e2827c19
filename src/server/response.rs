use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("OK")
}

/// Distinct header lines kept before new ones are dropped.
pub const MAX_HEADER_LINES: usize = 1024;

/// `may_minihttp` only takes `'static` header lines, so every distinct line
/// is leaked once and reused afterwards. Fixed lines (content types, CORS)
/// stay well under the cap; per-request values past it are not sent.
static HEADER_LINES: Lazy<Mutex<HashMap<String, &'static str>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn header_line(name: &str, value: &str) -> Option<&'static str> {
    let mut lines = match HEADER_LINES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    intern_line(&mut lines, name, value, MAX_HEADER_LINES)
}

fn intern_line(
    lines: &mut HashMap<String, &'static str>,
    name: &str,
    value: &str,
    cap: usize,
) -> Option<&'static str> {
    let line = format!("{name}: {value}");
    if let Some(interned) = lines.get(&line) {
        return Some(*interned);
    }
    if lines.len() >= cap {
        warn!(header = %name, cap, "Header line cache full, header not sent");
        return None;
    }
    let interned: &'static str = Box::leak(line.clone().into_boxed_str());
    lines.insert(line, interned);
    Some(interned)
}

/// Write a handler response.
///
/// `null` bodies are sent empty, strings as `text/plain` and everything
/// else as JSON, unless the handler set its own `content-type`.
pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));
    for (name, value) in &hr.headers {
        if name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        if let Some(line) = header_line(name, value) {
            res.header(line);
        }
    }
    let explicit_ct = hr.get_header("content-type");
    match &hr.body {
        Value::Null => {}
        Value::String(s) => {
            res.header(content_type_line(explicit_ct, "Content-Type: text/plain"));
            res.body_vec(s.clone().into_bytes());
        }
        other => {
            res.header(content_type_line(explicit_ct, "Content-Type: application/json"));
            res.body_vec(serde_json::to_vec(other).unwrap_or_default());
        }
    }
}

/// `default` is a complete header line used when none was set or the cache is full.
fn content_type_line(explicit: Option<&str>, default: &'static str) -> &'static str {
    explicit
        .and_then(|ct| header_line("Content-Type", ct))
        .unwrap_or(default)
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
