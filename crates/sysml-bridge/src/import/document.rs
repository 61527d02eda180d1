//! Typed views of the XML-derived interchange documents
//!
//! Both documents arrive as JSON trees produced from XMI: namespaced names
//! are spelled `"{namespace-uri}:{local}"` and XML attributes carry a leading
//! `@`. Fields whose cardinality depends on the source XML (one element or a
//! repeated element) are normalized to `Vec` here, before any collector sees
//! them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::xml::document_from_xml;
use crate::core::ImportError;

/// Key of the UML model inside a model document
pub const UML_MODEL: &str = "http://www.eclipse.org/uml2/5.0.0/UML:Model";
/// XMI id attribute of model elements
pub const XMI_ID: &str = "@http://www.omg.org/spec/XMI/20131001:id";
/// XMI type attribute of model elements
pub const XMI_TYPE: &str = "@http://www.omg.org/spec/XMI/20131001:type";
/// XMI type attribute inside notation documents
pub const NOTATION_TYPE: &str = "@http://www.omg.org/XMI:type";
/// Key of a diagram inside a notation document
pub const NOTATION_DIAGRAM: &str = "http://www.eclipse.org/gmf/runtime/1.0.2/notation:Diagram";
pub const BLOCK_STEREOTYPE: &str = "http://www.eclipse.org/papyrus/0.7.0/SysML/Blocks:Block";
pub const CONSTRAINT_BLOCK_STEREOTYPE: &str =
    "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintBlock";
pub const CONSTRAINT_PROPERTY_STEREOTYPE: &str =
    "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintProperty";

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept a single value, a list, or nothing at all
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

/// Model document: the UML model plus SysML stereotype applications
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysmlDocument {
    #[serde(rename = "http://www.eclipse.org/uml2/5.0.0/UML:Model", default)]
    pub model: Option<UmlModel>,

    #[serde(
        rename = "http://www.eclipse.org/papyrus/0.7.0/SysML/Blocks:Block",
        default,
        deserialize_with = "one_or_many"
    )]
    pub blocks: Vec<StereotypeApplication>,

    #[serde(
        rename = "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintBlock",
        default,
        deserialize_with = "one_or_many"
    )]
    pub constraint_blocks: Vec<StereotypeApplication>,

    #[serde(
        rename = "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintProperty",
        default,
        deserialize_with = "one_or_many"
    )]
    pub constraint_properties: Vec<StereotypeApplication>,
}

impl SysmlDocument {
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a `.uml` XMI file
    pub fn from_xml(text: &str) -> Result<Self, ImportError> {
        Self::from_value(document_from_xml(text)?)
    }

    /// Parse XML or JSON, whichever `text` holds
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        if looks_like_xml(text) {
            Self::from_xml(text)
        } else {
            Self::from_json(text)
        }
    }

    /// The UML model, required for any import
    pub fn require_model(&self) -> Result<&UmlModel, ImportError> {
        self.model
            .as_ref()
            .ok_or_else(|| ImportError::malformed(format!("model document has no {}", UML_MODEL)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UmlModel {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "packagedElement", default, deserialize_with = "one_or_many")]
    pub packaged_elements: Vec<PackagedElement>,
}

/// A top-level model element (class, association, ...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackagedElement {
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:id", default)]
    pub xmi_id: Option<String>,

    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:type", default)]
    pub xmi_type: Option<String>,

    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "ownedAttribute", default, deserialize_with = "one_or_many")]
    pub owned_attributes: Vec<OwnedAttribute>,

    #[serde(rename = "ownedConnector", default, deserialize_with = "one_or_many")]
    pub owned_connectors: Vec<OwnedConnector>,
}

impl PackagedElement {
    /// UML type without its `uml:` prefix
    pub fn uml_type(&self) -> &str {
        strip_uml_prefix(self.xmi_type.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnedAttribute {
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:id", default)]
    pub xmi_id: Option<String>,

    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:type", default)]
    pub xmi_type: Option<String>,

    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    /// Id of the element this attribute is typed by
    #[serde(rename = "@type", default)]
    pub declared_id: Option<String>,
}

impl OwnedAttribute {
    pub fn uml_type(&self) -> &str {
        strip_uml_prefix(self.xmi_type.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnedConnector {
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:id", default)]
    pub xmi_id: Option<String>,

    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "end", default, deserialize_with = "one_or_many")]
    pub ends: Vec<ConnectorEnd>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorEnd {
    #[serde(rename = "@role", default)]
    pub role: Option<String>,
}

/// One applied stereotype; which base attribute is set depends on the
/// collection it came from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StereotypeApplication {
    #[serde(rename = "@base_Class", default)]
    pub base_class: Option<String>,

    #[serde(rename = "@base_Property", default)]
    pub base_property: Option<String>,
}

/// A notation diagram: layout of one model diagram
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotationDiagram {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(default)]
    pub element: Option<NotationElement>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub children: Vec<NotationNode>,
}

impl NotationDiagram {
    /// Parse a notation diagram given either bare or under its diagram key
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_value(mut value: Value) -> Result<Self, ImportError> {
        let diagram = match value.get_mut(NOTATION_DIAGRAM).map(Value::take) {
            // Several diagrams in one file: the first one is imported
            Some(Value::Array(mut diagrams)) => {
                if diagrams.is_empty() {
                    return Err(ImportError::malformed("notation document has no diagram"));
                }
                diagrams.swap_remove(0)
            }
            Some(diagram) => diagram,
            None => value,
        };
        Ok(serde_json::from_value(diagram)?)
    }

    /// Parse a `.notation` XMI file
    pub fn from_xml(text: &str) -> Result<Self, ImportError> {
        Self::from_value(document_from_xml(text)?)
    }

    /// Parse XML or JSON, whichever `text` holds
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        if looks_like_xml(text) {
            Self::from_xml(text)
        } else {
            Self::from_json(text)
        }
    }

    /// XMI id of the element the diagram is drawn for
    pub fn root_element_id(&self) -> Result<&str, ImportError> {
        self.element
            .as_ref()
            .and_then(NotationElement::fragment)
            .ok_or_else(|| ImportError::malformed("notation diagram has no element reference"))
    }
}

/// A view inside a notation diagram
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotationNode {
    #[serde(default)]
    pub element: Option<NotationElement>,

    #[serde(rename = "layoutConstraint", default)]
    pub layout_constraint: Option<LayoutConstraint>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub children: Vec<NotationNode>,
}

/// Reference from a view to a model element
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotationElement {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,

    #[serde(rename = "@http://www.omg.org/XMI:type", default)]
    pub xmi_type: Option<String>,
}

impl NotationElement {
    /// Referenced XMI id: the part after `#`, or the whole href without one
    pub fn fragment(&self) -> Option<&str> {
        let href = self.href.as_deref()?;
        Some(href.split_once('#').map_or(href, |(_, fragment)| fragment))
    }

    /// Whether the reference points at a UML element other than a stereotype
    pub fn is_uml_element(&self) -> bool {
        self.xmi_type
            .as_deref()
            .is_some_and(|t| t.starts_with("uml:") && !t.starts_with("uml:Stereotype"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConstraint {
    #[serde(rename = "@x", default)]
    pub x: Option<RawCoordinate>,

    #[serde(rename = "@y", default)]
    pub y: Option<RawCoordinate>,
}

/// A coordinate as found in the document: XML gives text, JSON may give numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    /// Integer value of the coordinate
    ///
    /// Text is read up to the first character that cannot continue an
    /// integer, so `"12.7"` gives 12. Text without any leading digits yields
    /// `None`.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            RawCoordinate::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            RawCoordinate::Number(_) => None,
            RawCoordinate::Text(text) => parse_integer_prefix(text),
        }
    }
}

fn parse_integer_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn looks_like_xml(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

fn strip_uml_prefix(xmi_type: &str) -> &str {
    xmi_type.strip_prefix("uml:").unwrap_or(xmi_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_and_list_forms_normalize() {
        let single = json!({
            UML_MODEL: {
                "packagedElement": {
                    XMI_ID: "_R1",
                    XMI_TYPE: "uml:Class",
                    "ownedAttribute": {XMI_ID: "_A1", "@name": "p1"}
                }
            },
            BLOCK_STEREOTYPE: {"@base_Class": "_B1"}
        });
        let doc = SysmlDocument::from_value(single).unwrap();
        let model = doc.require_model().unwrap();
        assert_eq!(model.packaged_elements.len(), 1);
        assert_eq!(model.packaged_elements[0].owned_attributes.len(), 1);
        assert_eq!(model.packaged_elements[0].uml_type(), "Class");
        assert_eq!(doc.blocks.len(), 1);
        assert!(doc.constraint_blocks.is_empty());

        let list = json!({
            UML_MODEL: {
                "packagedElement": [
                    {XMI_ID: "_R1", "ownedAttribute": [{XMI_ID: "_A1"}, {XMI_ID: "_A2"}]},
                    {XMI_ID: "_S1"}
                ]
            }
        });
        let doc = SysmlDocument::from_value(list).unwrap();
        let model = doc.require_model().unwrap();
        assert_eq!(model.packaged_elements.len(), 2);
        assert_eq!(model.packaged_elements[0].owned_attributes.len(), 2);
    }

    #[test]
    fn test_missing_model_is_malformed() {
        let doc = SysmlDocument::from_value(json!({})).unwrap();
        assert!(matches!(
            doc.require_model(),
            Err(ImportError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_href_fragment() {
        let element = NotationElement {
            href: Some("model.uml#_A1".to_string()),
            xmi_type: Some("uml:Property".to_string()),
        };
        assert_eq!(element.fragment(), Some("_A1"));
        assert!(element.is_uml_element());

        let bare = NotationElement {
            href: Some("_A2".to_string()),
            xmi_type: Some("uml:Stereotype".to_string()),
        };
        assert_eq!(bare.fragment(), Some("_A2"));
        assert!(!bare.is_uml_element());
    }

    #[test]
    fn test_notation_accepts_wrapped_diagram() {
        let wrapped = json!({
            NOTATION_DIAGRAM: {
                "@name": "Params",
                "element": {"@href": "m.uml#_R1"},
                "children": {"children": []}
            }
        });
        let diagram = NotationDiagram::from_value(wrapped).unwrap();
        assert_eq!(diagram.name.as_deref(), Some("Params"));
        assert_eq!(diagram.root_element_id().unwrap(), "_R1");
        assert_eq!(diagram.children.len(), 1);
    }

    #[test]
    fn test_coordinate_parsing() {
        assert_eq!(RawCoordinate::Text("-50".into()).to_integer(), Some(-50));
        assert_eq!(RawCoordinate::Text("12.7".into()).to_integer(), Some(12));
        assert_eq!(RawCoordinate::Text(" 30px".into()).to_integer(), Some(30));
        assert_eq!(RawCoordinate::Text("abc".into()).to_integer(), None);
        assert_eq!(RawCoordinate::Number(-7.9).to_integer(), Some(-7));
    }
}
