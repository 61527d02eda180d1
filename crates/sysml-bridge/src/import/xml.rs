//! XMI to JSON tree conversion
//!
//! Produces the same tree shape the typed documents deserialize from:
//! element and attribute names are qualified as `"{namespace-uri}:{local}"`
//! when namespaced, attributes are prefixed with `@`, repeated elements
//! collapse into arrays and non-blank text lands under `#text`.

use roxmltree::{Document, ExpandedName, Node};
use serde_json::{Map, Value};
use tracing::{debug, span, Level};

use crate::core::ImportError;

const TEXT_KEY: &str = "#text";

/// Convert an XMI document into a JSON tree
///
/// The result is an object keyed by the root element's qualified name. An
/// `xmi:XMI` wrapper is dropped, so its children become the top-level keys.
pub fn document_from_xml(text: &str) -> Result<Value, ImportError> {
    let span = span!(Level::DEBUG, "document_from_xml", bytes = text.len());
    let _enter = span.enter();

    let document = Document::parse(text)?;
    let root = document.root_element();
    let tree = if is_xmi_wrapper(root) {
        element_content(root)
    } else {
        let mut tree = Map::new();
        tree.insert(qualified_name(root.tag_name()), element_to_value(root));
        tree
    };
    debug!(top_level = tree.len(), "Converted XML document");
    Ok(Value::Object(tree))
}

fn is_xmi_wrapper(node: Node<'_, '_>) -> bool {
    let tag = node.tag_name();
    tag.name() == "XMI" && tag.namespace().is_some_and(|ns| ns.starts_with("http://www.omg.org/"))
}

fn qualified_name(name: ExpandedName<'_, '_>) -> String {
    match name.namespace() {
        Some(namespace) => format!("{}:{}", namespace, name.name()),
        None => name.name().to_string(),
    }
}

fn element_to_value(node: Node<'_, '_>) -> Value {
    Value::Object(element_content(node))
}

fn element_content(node: Node<'_, '_>) -> Map<String, Value> {
    let mut content = Map::new();
    for attribute in node.attributes() {
        let key = match attribute.namespace() {
            Some(namespace) => format!("@{}:{}", namespace, attribute.name()),
            None => format!("@{}", attribute.name()),
        };
        content.insert(key, Value::String(attribute.value().to_string()));
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            insert_repeated(
                &mut content,
                qualified_name(child.tag_name()),
                element_to_value(child),
            );
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }
    let text = text.trim();
    if !text.is_empty() {
        content.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    }
    content
}

/// Insert `value` under `key`, turning a second occurrence into an array
fn insert_repeated(content: &mut Map<String, Value>, key: String, value: Value) {
    match content.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            content.insert(key, value);
        }
    }
}
