use crate::spec::SpecError;
use serde_json::{Number, Value};

/// The value kinds a schema `type` can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Null,
    Boolean,
    String,
    Number,
    Integer,
    Object,
    Array,
}

impl SchemaType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "null" => Some(SchemaType::Null),
            "boolean" => Some(SchemaType::Boolean),
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "object" => Some(SchemaType::Object),
            "array" => Some(SchemaType::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }

    /// Whether `value` is an instance of this type.
    ///
    /// `integer` accepts any number without a fractional part, so `10.0`
    /// counts as an integer.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            SchemaType::Null => value.is_null(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.trunc() == f)
                }
                _ => false,
            },
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema `type`, normalised to a set.
///
/// Remembers whether it was written as a list because the type error message
/// differs between the two spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSet {
    /// No `type` declared: every value is accepted.
    Any,
    Single(SchemaType),
    OneOf(Vec<SchemaType>),
}

impl TypeSet {
    pub fn members(&self) -> &[SchemaType] {
        match self {
            TypeSet::Any => &[],
            TypeSet::Single(t) => std::slice::from_ref(t),
            TypeSet::OneOf(types) => types,
        }
    }

    /// First member the value is an instance of.
    pub fn matching(&self, value: &Value) -> Option<SchemaType> {
        self.members().iter().copied().find(|t| t.matches(value))
    }

    /// `'string'` for a single type, `one of string,null.` for a list.
    pub fn expected(&self) -> String {
        match self {
            TypeSet::Any => "any value".to_string(),
            TypeSet::Single(t) => format!("'{t}'"),
            TypeSet::OneOf(types) => {
                let names: Vec<&str> = types.iter().map(SchemaType::as_str).collect();
                format!("one of {}.", names.join(","))
            }
        }
    }
}

/// A schema node, checked for shape once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub types: TypeSet,
    pub format: Option<String>,
    pub multiple_of: Option<Number>,
    /// Declared properties in document order.
    pub properties: Vec<(String, Schema)>,
    pub required: Vec<String>,
    pub items: Option<Box<Schema>>,
}

impl Schema {
    /// A schema that accepts everything.
    pub fn any() -> Self {
        Schema {
            types: TypeSet::Any,
            format: None,
            multiple_of: None,
            properties: Vec::new(),
            required: Vec::new(),
            items: None,
        }
    }

    /// Parse a resolved schema node.
    ///
    /// Fields outside the supported subset are ignored. A node still carrying
    /// a `$ref` was not resolved and is rejected.
    pub fn parse(node: &Value, location: &str) -> Result<Schema, SpecError> {
        let fields = node
            .as_object()
            .ok_or_else(|| SpecError::malformed_schema(location, "schema must be a mapping"))?;

        if fields.contains_key("$ref") {
            return Err(SpecError::malformed_schema(
                location,
                "schema still holds an unresolved $ref",
            ));
        }

        let types = match fields.get("type") {
            None => TypeSet::Any,
            Some(Value::String(name)) => TypeSet::Single(parse_type_name(name, location)?),
            Some(Value::Array(names)) => {
                let types = names
                    .iter()
                    .map(|n| {
                        n.as_str()
                            .ok_or_else(|| {
                                SpecError::malformed_schema(location, "type list must hold strings")
                            })
                            .and_then(|n| parse_type_name(n, location))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if types.is_empty() {
                    return Err(SpecError::malformed_schema(location, "type list is empty"));
                }
                TypeSet::OneOf(types)
            }
            Some(other) => {
                return Err(SpecError::malformed_schema(
                    location,
                    format!("type must be a string or a list, got {other}"),
                ))
            }
        };

        let format = fields
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string);

        let multiple_of = match fields.get("multipleOf") {
            None => None,
            Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f > 0.0) => Some(n.clone()),
            Some(_) => {
                return Err(SpecError::malformed_schema(
                    location,
                    "multipleOf must be a positive number",
                ))
            }
        };

        let properties = match fields.get("properties") {
            None => Vec::new(),
            Some(Value::Object(props)) => props
                .iter()
                .map(|(name, child)| {
                    Ok((
                        name.clone(),
                        Schema::parse(child, &format!("{location}.properties.{name}"))?,
                    ))
                })
                .collect::<Result<Vec<_>, SpecError>>()?,
            Some(_) => {
                return Err(SpecError::malformed_schema(
                    location,
                    "properties must be a mapping",
                ))
            }
        };

        let required = match fields.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names
                .iter()
                .map(|n| {
                    n.as_str().map(str::to_string).ok_or_else(|| {
                        SpecError::malformed_schema(location, "required must list property names")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(SpecError::malformed_schema(
                    location,
                    "required must be a list",
                ))
            }
        };

        let items = match fields.get("items") {
            None => None,
            Some(child) => Some(Box::new(Schema::parse(child, &format!("{location}.items"))?)),
        };

        Ok(Schema {
            types,
            format,
            multiple_of,
            properties,
            required,
            items,
        })
    }
}

fn parse_type_name(name: &str, location: &str) -> Result<SchemaType, SpecError> {
    SchemaType::parse(name)
        .ok_or_else(|| SpecError::malformed_schema(location, format!("unknown type '{name}'")))
}
