use crate::schema::{compile_schema, CompiledSchema, SchemaType};
use crate::spec::{Operation, ParameterLocation};
use serde_json::Value;
use std::collections::HashMap;

pub const MISSING_CONTENT_TYPE: &str = "Please set 'Content-Type' header.";

/// The parts of a request the gate looks at.
///
/// Header names are expected in lower case.
#[derive(Debug, Clone, Copy)]
pub struct RequestParts<'a> {
    pub headers: &'a HashMap<String, String>,
    pub path_params: &'a HashMap<String, String>,
    pub body: Option<&'a Value>,
}

impl RequestParts<'_> {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}

/// Pre-handler gate for one operation.
///
/// Built once per route at startup; [`RequestValidator::validate`] runs for
/// every request and returns all errors it finds.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    body: Option<BodyValidator>,
    path_params: Vec<PathParamValidator>,
}

#[derive(Debug, Clone)]
struct BodyValidator {
    accepted: Vec<String>,
    /// Compiled body schema per content type; `None` when none is declared.
    schemas: Vec<(String, Option<CompiledSchema>)>,
}

#[derive(Debug, Clone)]
struct PathParamValidator {
    name: String,
    decode_as: Vec<SchemaType>,
    schema: CompiledSchema,
}

impl RequestValidator {
    pub fn for_operation(operation: &Operation) -> Self {
        let body = operation.request_body.as_ref().map(|rb| BodyValidator {
            accepted: rb.content_types().into_iter().map(str::to_string).collect(),
            schemas: rb
                .content
                .iter()
                .map(|media| {
                    (
                        media.content_type.clone(),
                        media.schema.as_ref().map(|s| compile_schema(s, "body")),
                    )
                })
                .collect(),
        });

        let path_params = operation
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
            .filter_map(|p| {
                let schema = p.schema.as_ref()?;
                Some(PathParamValidator {
                    name: p.name.clone(),
                    decode_as: schema.types.members().to_vec(),
                    schema: compile_schema(schema, format!("params.{}", p.name)),
                })
            })
            .collect();

        RequestValidator { body, path_params }
    }

    /// True when the operation declares nothing to check.
    pub fn is_noop(&self) -> bool {
        self.body.is_none() && self.path_params.is_empty()
    }

    /// Body errors first, then path parameter errors.
    pub fn validate(&self, req: &RequestParts<'_>) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(body) = &self.body {
            errors.extend(body.validate(req));
        }
        for param in &self.path_params {
            errors.extend(param.validate(req.path_params));
        }
        errors
    }
}

impl BodyValidator {
    fn validate(&self, req: &RequestParts<'_>) -> Vec<String> {
        let Some(header) = req.content_type() else {
            return vec![MISSING_CONTENT_TYPE.to_string()];
        };
        let media_type = essence(header);
        let Some((_, schema)) = self.schemas.iter().find(|(ct, _)| essence(ct) == media_type)
        else {
            return vec![format!(
                "Content type '{header}' not supported. Supported content types are {}",
                self.accepted.join(",")
            )];
        };
        match schema {
            Some(schema) => schema.validate(req.body.unwrap_or(&Value::Null)),
            None => Vec::new(),
        }
    }
}

impl PathParamValidator {
    fn validate(&self, path_params: &HashMap<String, String>) -> Vec<String> {
        match path_params.get(&self.name) {
            Some(raw) if !raw.is_empty() => {
                self.schema.validate(&decode_path_value(raw, &self.decode_as))
            }
            _ => vec![format!("params.{} is required", self.name)],
        }
    }
}

/// `application/json; charset=utf-8` → `application/json`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Decode a raw path capture into the first declared primitive it parses as.
///
/// Captures are strings on the wire; a value matching none of the declared
/// types stays a string and fails the type check.
pub fn decode_path_value(raw: &str, types: &[SchemaType]) -> Value {
    for t in types {
        let decoded = match t {
            SchemaType::Integer => raw.parse::<i64>().ok().map(Value::from),
            SchemaType::Number => raw.parse::<f64>().ok().map(Value::from),
            SchemaType::Boolean => raw.parse::<bool>().ok().map(Value::from),
            SchemaType::Null => (raw == "null").then_some(Value::Null),
            SchemaType::String => Some(Value::String(raw.to_string())),
            SchemaType::Object | SchemaType::Array => serde_json::from_str(raw).ok(),
        };
        if let Some(value) = decoded {
            return value;
        }
    }
    Value::String(raw.to_string())
}
