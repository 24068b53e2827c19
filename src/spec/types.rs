use crate::schema::Schema;
use http::Method;
use std::sync::Arc;

/// HTTP verbs an operation can be declared under in a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Verb {
    pub const ALL: [Verb; 8] = [
        Verb::Get,
        Verb::Put,
        Verb::Post,
        Verb::Delete,
        Verb::Options,
        Verb::Head,
        Verb::Patch,
        Verb::Trace,
    ];

    /// Field name of the verb inside a path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Post => "post",
            Verb::Delete => "delete",
            Verb::Options => "options",
            Verb::Head => "head",
            Verb::Patch => "patch",
            Verb::Trace => "trace",
        }
    }

    pub fn from_field(field: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|v| v.as_str() == field)
    }

    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
            Verb::Options => Method::OPTIONS,
            Verb::Head => Method::HEAD,
            Verb::Patch => Method::PATCH,
            Verb::Trace => Method::TRACE,
        }
    }

    /// Name a handler unit exports for this verb.
    ///
    /// `delete` is exported as `remove` so handler code never has to name a
    /// function after a reserved word.
    pub fn export_name(&self) -> &'static str {
        match self {
            Verb::Delete => "remove",
            other => other.as_str(),
        }
    }
}

impl TryFrom<&Method> for Verb {
    type Error = ();

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        Verb::ALL
            .into_iter()
            .find(|v| v.method() == *method)
            .ok_or(())
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// A fully resolved description document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub servers: Vec<Server>,
    /// Route patterns in declaration order.
    pub paths: Vec<(String, PathItem)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Operations in declaration order.
    pub operations: Vec<(Verb, Operation)>,
}

#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub operation_id: Option<String>,
    pub request_body: Option<RequestBody>,
    pub parameters: Vec<ParameterMeta>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    /// Content type to body schema, in declaration order.
    pub content: Vec<MediaType>,
}

impl RequestBody {
    pub fn content_types(&self) -> Vec<&str> {
        self.content.iter().map(|m| m.content_type.as_str()).collect()
    }

    pub fn media(&self, content_type: &str) -> Option<&MediaType> {
        self.content.iter().find(|m| m.content_type == content_type)
    }
}

#[derive(Debug, Clone)]
pub struct MediaType {
    pub content_type: String,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub schema: Option<Schema>,
}

/// One declared operation under one server, ready to be routed.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub verb: Verb,
    /// Base path of the server this route was enumerated for.
    pub base_path: String,
    /// Route pattern exactly as declared, e.g. `/articles/{slug}`.
    pub path_pattern: String,
    /// Base path plus pattern in capture syntax, e.g. `/api/articles/:slug`.
    pub route: String,
    /// Lookup key for the handler registry, e.g. `/api/articles/[slug]`.
    pub handler_key: String,
    pub operation: Arc<Operation>,
}

impl RouteMeta {
    pub fn method(&self) -> Method {
        self.verb.method()
    }
}
