//! Schema documents: the read-only input side of a conversion.
//!
//! Raw JSON is deserialized into [`RawNode`] (serde, path-aware errors) and then
//! checked into the closed [`NodeKind`] variants the mapper matches on. Object and
//! union bodies sit behind `Rc` so lazily-resolved type nodes can hold on to them.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::Value;

use crate::error::DocumentError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A top-level schema: identifier, root node and its named definitions.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub id: Option<String>,
    pub root: SchemaNode,
    pub definitions: IndexMap<String, SchemaNode>,
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub description: Option<String>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Any `type` keyword that is not `object`/`array`; checked when mapped.
    Scalar { keyword: String },
    Array(Box<SchemaNode>),
    Object(Rc<ObjectSchema>),
    Enum(EnumSchema),
    Reference(String),
    Union(Rc<UnionSchema>),
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: IndexSet<String>,
}

#[derive(Debug, Clone)]
pub struct EnumSchema {
    /// Declared `type`, if any. Only `string` is convertible.
    pub base: Option<String>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct UnionSchema {
    pub branches: Vec<SchemaNode>,
}

// ————————————————————————————————————————————————————————————————————————————
// RAW (serde) SHAPE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default, alias = "$id")]
    id: Option<String>,
    #[serde(default, rename = "type")]
    type_: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    properties: IndexMap<String, RawNode>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    items: Option<Box<RawNode>>,
    #[serde(default, rename = "enum")]
    enum_: Option<Vec<Value>>,
    #[serde(default, rename = "$ref")]
    reference: Option<String>,
    #[serde(default)]
    definitions: IndexMap<String, RawNode>,
    #[serde(default)]
    switch: Option<Vec<RawBranch>>,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    // the discriminating condition is not needed to build the union
    #[serde(default, rename = "if")]
    _condition: Option<Value>,
    then: RawNode,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaDocument {
    pub fn from_str(src: &str) -> Result<Self, DocumentError> {
        let raw: RawNode = crate::path_de::from_str_with_path(src)?;
        Self::from_raw(raw)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let raw: RawNode = crate::path_de::from_slice_with_path(bytes)?;
        Self::from_raw(raw)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let raw: RawNode = crate::path_de::from_value_with_path(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(mut raw: RawNode) -> Result<Self, DocumentError> {
        let id = raw.id.take();
        let definitions = std::mem::take(&mut raw.definitions)
            .into_iter()
            .map(|(name, node)| {
                let node = SchemaNode::from_raw(node, &format!("#/definitions/{name}"))?;
                Ok((name, node))
            })
            .collect::<Result<IndexMap<_, _>, DocumentError>>()?;
        let root = SchemaNode::from_raw(raw, "#")?;
        Ok(Self { id, root, definitions })
    }
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self { description: None, kind }
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let raw: RawNode = crate::path_de::from_value_with_path(value)?;
        Self::from_raw(raw, "#")
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, NodeKind::Reference(_))
    }

    /// Precedence: `$ref`, then `switch`, then `enum`, then `type`.
    fn from_raw(raw: RawNode, path: &str) -> Result<Self, DocumentError> {
        let malformed = |reason: &str| DocumentError::Malformed {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let description = raw.description;

        let kind = if let Some(pointer) = raw.reference {
            NodeKind::Reference(pointer)
        } else if let Some(branches) = raw.switch {
            if raw.type_.is_some() {
                return Err(malformed("`switch` cannot be combined with `type`"));
            }
            if branches.is_empty() {
                return Err(malformed("`switch` needs at least one branch"));
            }
            let branches = branches
                .into_iter()
                .enumerate()
                .map(|(i, b)| Self::from_raw(b.then, &format!("{path}/switch/{i}/then")))
                .collect::<Result<Vec<_>, _>>()?;
            NodeKind::Union(Rc::new(UnionSchema { branches }))
        } else if let Some(values) = raw.enum_ {
            if values.is_empty() {
                return Err(malformed("`enum` needs at least one value"));
            }
            NodeKind::Enum(EnumSchema { base: raw.type_, values })
        } else {
            match raw.type_.as_deref() {
                None => return Err(malformed("no `type`, `enum`, `$ref` or `switch`")),
                Some("object") => {
                    let properties = raw
                        .properties
                        .into_iter()
                        .map(|(name, node)| {
                            let node = Self::from_raw(node, &format!("{path}/properties/{name}"))?;
                            Ok((name, node))
                        })
                        .collect::<Result<IndexMap<_, _>, DocumentError>>()?;
                    let required = raw.required.into_iter().collect();
                    NodeKind::Object(Rc::new(ObjectSchema { properties, required }))
                }
                Some("array") => {
                    let items = raw.items.ok_or_else(|| malformed("array without `items`"))?;
                    let items = Self::from_raw(*items, &format!("{path}/items"))?;
                    NodeKind::Array(Box::new(items))
                }
                Some(keyword) => NodeKind::Scalar { keyword: keyword.to_string() },
            }
        };

        Ok(Self { description, kind })
    }
}

impl ObjectSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.contains(property)
    }
}

impl EnumSchema {
    /// The literal values, when every one of them is a JSON string.
    pub fn string_values(&self) -> Option<Vec<&str>> {
        self.values.iter().map(Value::as_str).collect()
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_document_with_definitions() {
        let doc = SchemaDocument::from_value(json!({
            "$id": "person",
            "type": "object",
            "description": "A person",
            "properties": {
                "name": { "type": "string" },
                "role": { "$ref": "#/definitions/role" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["name"],
            "definitions": {
                "role": { "type": "string", "enum": ["admin", "user"] }
            }
        }))
        .unwrap();

        assert_eq!(doc.id.as_deref(), Some("person"));
        assert_eq!(doc.root.description.as_deref(), Some("A person"));
        let NodeKind::Object(obj) = &doc.root.kind else { panic!("root is an object") };
        assert_eq!(obj.properties.keys().collect::<Vec<_>>(), ["name", "role", "tags"]);
        assert!(obj.is_required("name"));
        assert!(!obj.is_required("tags"));
        assert!(obj.properties["role"].is_reference());
        assert!(matches!(obj.properties["tags"].kind, NodeKind::Array(_)));
        assert!(matches!(doc.definitions["role"].kind, NodeKind::Enum(_)));
    }

    #[test]
    fn switch_becomes_union() {
        let doc = SchemaDocument::from_value(json!({
            "id": "pet",
            "switch": [
                { "if": { "properties": { "kind": { "enum": ["cat"] } } }, "then": { "$ref": "#/definitions/cat" } },
                { "then": { "$ref": "#/definitions/dog" } }
            ]
        }))
        .unwrap();
        let NodeKind::Union(union) = &doc.root.kind else { panic!("root is a union") };
        assert_eq!(union.branches.len(), 2);
    }

    #[test]
    fn unknown_keywords_are_kept_for_the_mapper() {
        let node = SchemaNode::from_value(json!({ "type": "date" })).unwrap();
        assert!(matches!(node.kind, NodeKind::Scalar { ref keyword } if keyword == "date"));

        let node = SchemaNode::from_value(json!({ "type": "integer", "enum": [1, 2] })).unwrap();
        let NodeKind::Enum(e) = node.kind else { panic!("enum") };
        assert_eq!(e.base.as_deref(), Some("integer"));
        assert!(e.string_values().is_none());
    }

    #[test]
    fn malformed_nodes_report_their_path() {
        let err = SchemaDocument::from_value(json!({
            "id": "x",
            "type": "object",
            "properties": { "list": { "type": "array" } }
        }))
        .unwrap_err();
        match err {
            DocumentError::Malformed { path, .. } => assert_eq!(path, "#/properties/list"),
            other => panic!("unexpected error: {other}"),
        }

        let err = SchemaNode::from_value(json!({ "type": "object", "switch": [] })).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));

        let err = SchemaNode::from_value(json!({ "description": "nothing" })).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));
    }

    #[test]
    fn json_shape_errors_carry_json_path() {
        let err = SchemaDocument::from_str(r#"{"id": "x", "type": "object", "required": "name"}"#)
            .unwrap_err();
        match err {
            DocumentError::Json { path, .. } => assert_eq!(path, "required"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
