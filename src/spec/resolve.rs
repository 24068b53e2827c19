use super::SpecError;
use serde_json::{Map, Value};

/// Expand every `$ref` in the document into the value it points at.
///
/// Traversal is depth first: object entries in document order, array
/// elements by index. A referenced subtree is resolved again after it is
/// substituted, so chains of references collapse completely. Keys sitting
/// next to a `$ref` are dropped along with it.
///
/// Cyclic references are not detected and recurse without bound.
pub fn resolve_document(document: &Value) -> Result<Value, SpecError> {
    resolve_value(document, document)
}

/// Resolve `value` against `root`, returning a new tree without `$ref` nodes.
pub fn resolve_value(root: &Value, value: &Value) -> Result<Value, SpecError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_value(root, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            if let Some(pointer) = map.get("$ref") {
                let pointer = pointer.as_str().ok_or_else(|| {
                    SpecError::malformed_document("$ref", "reference pointer must be a string")
                })?;
                let target = resolve_pointer(root, pointer)?;
                return resolve_value(root, target);
            }
            map.iter()
                .map(|(key, entry)| Ok((key.clone(), resolve_value(root, entry)?)))
                .collect::<Result<Map<_, _>, SpecError>>()
                .map(Value::Object)
        }
        leaf => Ok(leaf.clone()),
    }
}

/// Look up a local pointer such as `#/components/schemas/Article`.
///
/// Segments are literal keys; numeric segments also index into arrays.
pub fn resolve_pointer<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, SpecError> {
    if !pointer.starts_with('#') {
        return Err(SpecError::UnsupportedReferenceKind {
            pointer: pointer.to_string(),
        });
    }

    pointer
        .split('/')
        .skip(1)
        .try_fold(root, |current, segment| {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            next.ok_or_else(|| SpecError::UnresolvedReference {
                pointer: pointer.to_string(),
                segment: segment.to_string(),
            })
        })
}
