use super::build::{enumerate_operations, parse_document};
use super::resolve::resolve_document;
use super::types::{Document, RouteMeta};
use anyhow::Context;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Read a description document from disk into a JSON tree.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_document(file_path: impl AsRef<Path>) -> anyhow::Result<Value> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;
    let is_yaml = matches!(
        file_path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        // Through serde_yaml::Value so unquoted keys like `200:` become strings.
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", file_path.display()))?;
        serde_json::to_value(yaml)
            .with_context(|| format!("unsupported YAML value in {}", file_path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", file_path.display()))?
    };
    debug!(path = %file_path.display(), "description document read");
    Ok(value)
}

/// Load, resolve and enumerate a description document.
pub fn load_spec(file_path: impl AsRef<Path>) -> anyhow::Result<(Document, Vec<RouteMeta>)> {
    let file_path = file_path.as_ref();
    let raw = load_document(file_path)?;
    load_spec_from_value(&raw).with_context(|| format!("invalid document {}", file_path.display()))
}

/// Resolve and enumerate an already parsed document tree.
pub fn load_spec_from_value(raw: &Value) -> anyhow::Result<(Document, Vec<RouteMeta>)> {
    let resolved = resolve_document(raw)?;
    let document = parse_document(&resolved)?;
    let routes = enumerate_operations(&document);
    info!(
        servers = document.servers.len(),
        paths = document.paths.len(),
        routes = routes.len(),
        "description document loaded"
    );
    Ok((document, routes))
}
