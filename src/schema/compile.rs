use super::datetime::is_date_time;
use super::types::{Schema, SchemaType, TypeSet};
use serde_json::{Number, Value};
use std::sync::Arc;

/// A schema compiled into a reusable check tree, bound to a label.
///
/// Compile once per operation at startup and call [`CompiledSchema::validate`]
/// for every request. Cloning shares the tree.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    label: String,
    root: Arc<Node>,
}

#[derive(Debug)]
struct Node {
    expected: String,
    kinds: Vec<Kind>,
}

#[derive(Debug)]
enum Kind {
    Null,
    Boolean,
    String {
        date_time: bool,
    },
    Number {
        integer: bool,
        multiple_of: Option<Number>,
    },
    Object {
        required: Vec<String>,
        properties: Vec<(String, Node)>,
    },
    Array {
        items: Option<Box<Node>>,
    },
}

/// Compile `schema` into a validator reporting errors under `label`.
pub fn compile_schema(schema: &Schema, label: impl Into<String>) -> CompiledSchema {
    CompiledSchema {
        label: label.into(),
        root: Arc::new(compile_node(schema)),
    }
}

/// Every JSON value matches one of these, so an untyped schema never fails
/// the type gate but still gets the checks of whatever kind the value is.
const UNTYPED_KINDS: [SchemaType; 6] = [
    SchemaType::Null,
    SchemaType::Boolean,
    SchemaType::String,
    SchemaType::Number,
    SchemaType::Object,
    SchemaType::Array,
];

fn compile_node(schema: &Schema) -> Node {
    let members = match schema.types {
        TypeSet::Any => &UNTYPED_KINDS[..],
        _ => schema.types.members(),
    };
    Node {
        expected: schema.types.expected(),
        kinds: members.iter().map(|t| compile_kind(*t, schema)).collect(),
    }
}

fn compile_kind(t: SchemaType, schema: &Schema) -> Kind {
    match t {
        SchemaType::Null => Kind::Null,
        SchemaType::Boolean => Kind::Boolean,
        SchemaType::String => Kind::String {
            date_time: schema.format.as_deref() == Some("date-time"),
        },
        SchemaType::Number | SchemaType::Integer => Kind::Number {
            integer: t == SchemaType::Integer,
            multiple_of: schema.multiple_of.clone(),
        },
        SchemaType::Object => Kind::Object {
            required: schema.required.clone(),
            properties: schema
                .properties
                .iter()
                .map(|(name, child)| (name.clone(), compile_node(child)))
                .collect(),
        },
        SchemaType::Array => Kind::Array {
            items: schema.items.as_deref().map(|s| Box::new(compile_node(s))),
        },
    }
}

impl Kind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Kind::Null => SchemaType::Null.matches(value),
            Kind::Boolean => SchemaType::Boolean.matches(value),
            Kind::String { .. } => SchemaType::String.matches(value),
            Kind::Number { integer: true, .. } => SchemaType::Integer.matches(value),
            Kind::Number { integer: false, .. } => SchemaType::Number.matches(value),
            Kind::Object { .. } => SchemaType::Object.matches(value),
            Kind::Array { .. } => SchemaType::Array.matches(value),
        }
    }
}

impl CompiledSchema {
    /// Every error `value` produces, in check order.
    ///
    /// A type mismatch yields a single error and hides the checks below it.
    pub fn validate(&self, value: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        check(&self.root, value, &self.label, &mut errors);
        errors
    }
}

fn check(node: &Node, value: &Value, label: &str, errors: &mut Vec<String>) {
    let Some(kind) = node.kinds.iter().find(|k| k.accepts(value)) else {
        errors.push(format!("Incorrect type for {label}, expected {}", node.expected));
        return;
    };

    match kind {
        Kind::Null | Kind::Boolean => {}
        Kind::String { date_time } => {
            if *date_time && !value.as_str().is_some_and(is_date_time) {
                errors.push(format!("{label} is not a valid datetime value."));
            }
        }
        Kind::Number { multiple_of, .. } => {
            if let (Some(divisor), Value::Number(n)) = (multiple_of, value) {
                if !is_multiple_of(n, divisor) {
                    errors.push(format!("{label} must be a multiple of {divisor}."));
                }
            }
        }
        Kind::Object {
            required,
            properties,
        } => {
            let Value::Object(fields) = value else {
                return;
            };
            for name in required {
                if !fields.contains_key(name) {
                    errors.push(format!("{label}.{name} is required."));
                }
            }
            for (name, child) in properties {
                if let Some(field) = fields.get(name) {
                    check(child, field, &format!("{label}.{name}"), errors);
                }
            }
        }
        Kind::Array { items } => {
            if let (Some(item_node), Value::Array(elements)) = (items, value) {
                for (index, element) in elements.iter().enumerate() {
                    check(item_node, element, &format!("{label}[{index}]"), errors);
                }
            }
        }
    }
}

fn is_multiple_of(value: &Number, divisor: &Number) -> bool {
    if let (Some(v), Some(d)) = (value.as_i64(), divisor.as_i64()) {
        if d != 0 {
            return v % d == 0;
        }
    }
    if let (Some(v), Some(d)) = (value.as_u64(), divisor.as_u64()) {
        if d != 0 {
            return v % d == 0;
        }
    }
    match (value.as_f64(), divisor.as_f64()) {
        (Some(v), Some(d)) if d != 0.0 => v % d == 0.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compiled(schema: Value, label: &str) -> CompiledSchema {
        compile_schema(&Schema::parse(&schema, label).unwrap(), label)
    }

    #[test]
    fn test_multiple_of() {
        let v = compiled(json!({ "type": "integer", "multipleOf": 5 }), "body.count");
        assert!(v.validate(&json!(10)).is_empty());
        assert_eq!(
            v.validate(&json!(7)),
            vec!["body.count must be a multiple of 5."]
        );
    }

    #[test]
    fn test_fractional_multiple_of() {
        let v = compiled(json!({ "type": "number", "multipleOf": 0.5 }), "price");
        assert!(v.validate(&json!(2.5)).is_empty());
        assert_eq!(v.validate(&json!(2.25)), vec!["price must be a multiple of 0.5."]);
    }

    #[test]
    fn test_required_and_property_types() {
        let v = compiled(
            json!({
                "type": "object",
                "required": ["a"],
                "properties": { "a": { "type": "string" } }
            }),
            "body",
        );
        assert_eq!(v.validate(&json!({})), vec!["body.a is required."]);
        assert_eq!(
            v.validate(&json!({ "a": 1 })),
            vec!["Incorrect type for body.a, expected 'string'"]
        );
        assert!(v.validate(&json!({ "a": "x" })).is_empty());
    }

    #[test]
    fn test_falsy_values_are_still_validated() {
        let v = compiled(
            json!({
                "type": "object",
                "required": ["count"],
                "properties": {
                    "count": { "type": "integer", "multipleOf": 3 },
                    "name": { "type": "integer" }
                }
            }),
            "body",
        );
        assert_eq!(
            v.validate(&json!({ "count": 0, "name": "" })),
            vec!["Incorrect type for body.name, expected 'integer'"]
        );
    }

    #[test]
    fn test_array_items_report_index() {
        let v = compiled(json!({ "type": "array", "items": { "type": "number" } }), "body");
        assert_eq!(
            v.validate(&json!([1, "x", 3])),
            vec!["Incorrect type for body[1], expected 'number'"]
        );
    }

    #[test]
    fn test_type_mismatch_hides_deeper_checks() {
        let v = compiled(
            json!({ "type": "object", "required": ["a", "b"] }),
            "body",
        );
        assert_eq!(
            v.validate(&json!([])),
            vec!["Incorrect type for body, expected 'object'"]
        );
    }

    #[test]
    fn test_type_list() {
        let v = compiled(json!({ "type": ["string", "null"], "format": "date-time" }), "at");
        assert!(v.validate(&json!(null)).is_empty());
        assert!(v.validate(&json!("2024-02-29T10:00:00Z")).is_empty());
        assert_eq!(
            v.validate(&json!("yesterday")),
            vec!["at is not a valid datetime value."]
        );
        assert_eq!(
            v.validate(&json!(3)),
            vec!["Incorrect type for at, expected one of string,null."]
        );
    }

    #[test]
    fn test_date_time_format() {
        let v = compiled(json!({ "type": "string", "format": "date-time" }), "body.at");
        assert_eq!(
            v.validate(&json!("2023-02-29T10:00:00Z")),
            vec!["body.at is not a valid datetime value."]
        );
        assert!(v.validate(&json!("2024-02-29T10:00:00Z")).is_empty());
        assert_eq!(v.validate(&json!("2024-02-29T10:00:00")).len(), 1);
    }

    #[test]
    fn test_errors_concatenate_in_order() {
        let v = compiled(
            json!({
                "type": "object",
                "required": ["id", "title"],
                "properties": {
                    "title": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "meta": {
                        "type": "object",
                        "properties": { "views": { "type": "integer", "multipleOf": 10 } }
                    }
                }
            }),
            "body",
        );
        let errors = v.validate(&json!({
            "title": false,
            "tags": ["a", 2, null],
            "meta": { "views": 15 }
        }));
        assert_eq!(
            errors,
            vec![
                "body.id is required.",
                "Incorrect type for body.title, expected 'string'",
                "Incorrect type for body.tags[1], expected 'string'",
                "Incorrect type for body.tags[2], expected 'string'",
                "body.meta.views must be a multiple of 10.",
            ]
        );
    }

    #[test]
    fn test_untyped_schema_accepts_anything() {
        let v = compile_schema(&Schema::any(), "body");
        assert!(v.validate(&json!({ "x": [1, 2] })).is_empty());
        assert!(v.validate(&json!(null)).is_empty());
    }

    #[test]
    fn test_untyped_object_schema_still_checks_fields() {
        let v = compiled(
            json!({
                "required": ["title"],
                "properties": { "title": { "type": "string" } }
            }),
            "body",
        );
        assert_eq!(v.validate(&json!({})), vec!["body.title is required."]);
        assert_eq!(
            v.validate(&json!({ "title": 5 })),
            vec!["Incorrect type for body.title, expected 'string'"]
        );
        assert!(v.validate(&json!({ "title": "Hi" })).is_empty());
        // non-objects skip the object checks
        assert!(v.validate(&json!("free text")).is_empty());
    }

    #[test]
    fn test_untyped_array_and_format_checks() {
        let v = compiled(json!({ "items": { "type": "integer" } }), "body");
        assert_eq!(
            v.validate(&json!([1, "two"])),
            vec!["Incorrect type for body[1], expected 'integer'"]
        );
        let v = compiled(json!({ "format": "date-time", "multipleOf": 2 }), "at");
        assert_eq!(v.validate(&json!("soon")), vec!["at is not a valid datetime value."]);
        assert_eq!(v.validate(&json!(3)), vec!["at must be a multiple of 2."]);
        assert!(v.validate(&json!(true)).is_empty());
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let v = compiled(json!({ "type": "integer" }), "n");
        assert!(v.validate(&json!(3.0)).is_empty());
        assert_eq!(v.validate(&json!(3.5)).len(), 1);
    }
}
