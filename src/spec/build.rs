use super::types::{
    Document, MediaType, Operation, ParameterLocation, ParameterMeta, PathItem, RequestBody,
    RouteMeta, Server, Verb,
};
use super::SpecError;
use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Path item fields that carry no operation and are skipped.
pub const PATH_ITEM_METADATA: [&str; 7] = [
    "$ref",
    "tags",
    "summary",
    "description",
    "externalDocs",
    "servers",
    "parameters",
];

static BRACE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("brace parameter regex should be valid"));
static CAPTURE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\w+)").expect("capture parameter regex should be valid"));
static BRACKET_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\w+)\]").expect("bracket parameter regex should be valid"));

/// Rewrite `{name}` segments into the router's `:name` capture syntax.
pub fn translate_route(pattern: &str) -> String {
    BRACE_PARAM.replace_all(pattern, ":$1").into_owned()
}

/// Turn a route in capture syntax into a handler registry key.
///
/// `/articles/:slug/comments/:id` becomes `/articles/[slug]/comments/[id]`.
pub fn route_to_handler_key(route: &str) -> String {
    CAPTURE_PARAM.replace_all(route, "[$1]").into_owned()
}

/// Inverse of [`route_to_handler_key`].
pub fn handler_key_to_route(key: &str) -> String {
    BRACKET_PARAM.replace_all(key, ":$1").into_owned()
}

/// Path component of a server URL, without a trailing slash.
///
/// Relative URLs are accepted; `/` and the empty path both yield `""`.
pub fn base_path_of(server_url: &str) -> String {
    url::Url::parse(server_url)
        .or_else(|_| url::Url::parse(&format!("http://dummy{server_url}")))
        .map(|u| {
            let p = u.path().trim_end_matches('/');
            if p == "/" || p.is_empty() {
                String::new()
            } else {
                p.to_string()
            }
        })
        .unwrap_or_default()
}

/// Build the typed document model from a resolved document tree.
pub fn parse_document(resolved: &Value) -> Result<Document, SpecError> {
    let root = resolved
        .as_object()
        .ok_or_else(|| SpecError::malformed_document("#", "document root must be an object"))?;

    let servers = match root.get("servers") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_server(entry, &format!("#/servers/{i}")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(SpecError::malformed_document(
                "#/servers",
                "servers must be a list",
            ))
        }
    };

    let paths = match root.get("paths") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(pattern, item)| Ok((pattern.clone(), parse_path_item(pattern, item)?)))
            .collect::<Result<Vec<_>, SpecError>>()?,
        Some(_) => {
            return Err(SpecError::malformed_document(
                "#/paths",
                "paths must be a mapping",
            ))
        }
    };

    Ok(Document { servers, paths })
}

fn parse_server(entry: &Value, location: &str) -> Result<Server, SpecError> {
    entry
        .get("url")
        .and_then(Value::as_str)
        .map(|url| Server {
            url: url.to_string(),
        })
        .ok_or_else(|| SpecError::malformed_document(location, "server needs a string 'url'"))
}

/// Dispatch on every field of a path item.
///
/// Known metadata is skipped, verbs become operations, anything else is an
/// [`SpecError::UnsupportedField`].
pub fn parse_path_item(pattern: &str, item: &Value) -> Result<PathItem, SpecError> {
    let fields = item.as_object().ok_or_else(|| {
        SpecError::malformed_document(format!("paths.{pattern}"), "path item must be a mapping")
    })?;

    let mut operations = Vec::new();
    for (field, value) in fields {
        if PATH_ITEM_METADATA.contains(&field.as_str()) {
            debug!(path = %pattern, field = %field, "skipping path item metadata");
            continue;
        }
        match Verb::from_field(field) {
            Some(verb) => {
                let location = format!("paths.{pattern}.{verb}");
                operations.push((verb, parse_operation(value, &location)?));
            }
            None => {
                return Err(SpecError::UnsupportedField {
                    path: pattern.to_string(),
                    field: field.clone(),
                })
            }
        }
    }
    Ok(PathItem { operations })
}

fn parse_operation(value: &Value, location: &str) -> Result<Operation, SpecError> {
    let empty = Map::new();
    let fields = match value {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(SpecError::malformed_document(
                location,
                "operation must be a mapping",
            ))
        }
    };

    let operation_id = fields
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_string);

    let request_body = match fields.get("requestBody") {
        None | Some(Value::Null) => None,
        Some(body) => Some(parse_request_body(body, &format!("{location}.requestBody"))?),
    };

    let parameters = match fields.get("parameters") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(params)) => params
            .iter()
            .enumerate()
            .map(|(i, p)| parse_parameter(p, &format!("{location}.parameters[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(SpecError::malformed_document(
                format!("{location}.parameters"),
                "parameters must be a list",
            ))
        }
    };

    Ok(Operation {
        operation_id,
        request_body,
        parameters,
    })
}

fn parse_request_body(body: &Value, location: &str) -> Result<RequestBody, SpecError> {
    let content = body
        .get("content")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            SpecError::malformed_document(location, "request body needs a 'content' mapping")
        })?;

    let content = content
        .iter()
        .map(|(content_type, media)| {
            let schema = match media.get("schema") {
                None | Some(Value::Null) => None,
                Some(node) => Some(Schema::parse(
                    node,
                    &format!("{location}.content.{content_type}.schema"),
                )?),
            };
            Ok(MediaType {
                content_type: content_type.clone(),
                schema,
            })
        })
        .collect::<Result<Vec<_>, SpecError>>()?;

    Ok(RequestBody { content })
}

fn parse_parameter(param: &Value, location: &str) -> Result<ParameterMeta, SpecError> {
    let name = param
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| SpecError::malformed_document(location, "parameter needs a string 'name'"))?;
    let raw_location = param
        .get("in")
        .and_then(Value::as_str)
        .ok_or_else(|| SpecError::malformed_document(location, "parameter needs a string 'in'"))?;
    let param_location = ParameterLocation::parse(raw_location).ok_or_else(|| {
        SpecError::malformed_document(location, format!("unknown parameter location '{raw_location}'"))
    })?;
    let schema = match param.get("schema") {
        None | Some(Value::Null) => None,
        Some(node) => Some(Schema::parse(node, &format!("{location}.schema"))?),
    };

    Ok(ParameterMeta {
        name: name.to_string(),
        location: param_location,
        schema,
    })
}

/// Flatten a document into one route per operation per server.
///
/// A document without servers is enumerated once with an empty base path.
pub fn enumerate_operations(document: &Document) -> Vec<RouteMeta> {
    let base_paths: Vec<String> = if document.servers.is_empty() {
        vec![String::new()]
    } else {
        document
            .servers
            .iter()
            .map(|s| base_path_of(&s.url))
            .collect()
    };

    let mut routes = Vec::new();
    for base_path in &base_paths {
        for (pattern, item) in &document.paths {
            for (verb, operation) in &item.operations {
                let route = translate_route(&format!("{base_path}{pattern}"));
                let handler_key = route_to_handler_key(&route);
                info!(verb = %verb, route = %route, "enumerated operation");
                routes.push(RouteMeta {
                    verb: *verb,
                    base_path: base_path.clone(),
                    path_pattern: pattern.clone(),
                    route,
                    handler_key,
                    operation: Arc::new(operation.clone()),
                });
            }
        }
    }
    routes
}
