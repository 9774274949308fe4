use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::naming;
use crate::registry::Registry;
use crate::schema::EnumSchema;
use crate::types::{EnumMember, EnumType};

/// Enum type for the schema at `qualified`, built once per path.
///
/// A path that already has an enum gets that enum back, whatever literals the
/// schema lists this time.
pub fn map_enum(
    registry: &mut Registry,
    schema: &EnumSchema,
    description: Option<&str>,
    qualified: &str,
) -> Result<Rc<EnumType>> {
    if let Some(existing) = registry.enum_type(qualified) {
        if let Some(literals) = schema.string_values() {
            if !existing.has_literals(literals) {
                warn!(path = qualified, "enum re-registered with different values; keeping the first");
            }
        }
        return Ok(existing.clone());
    }

    if schema.base.as_deref() != Some("string") {
        return Err(ConvertError::UnsupportedEnumBaseType {
            path: qualified.to_string(),
            found: schema.base.clone().unwrap_or_else(|| "no type".to_string()),
        });
    }
    let literals = schema
        .values
        .iter()
        .map(|v| {
            v.as_str().ok_or_else(|| ConvertError::UnsupportedEnumBaseType {
                path: qualified.to_string(),
                found: format!("{} literal", json_kind(v)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    build(registry, qualified, &literals, description)
}

/// Builds and registers the enum type and its value map for `literals`.
pub fn build(
    registry: &mut Registry,
    qualified: &str,
    literals: &[&str],
    description: Option<&str>,
) -> Result<Rc<EnumType>> {
    let mut values = IndexMap::<String, String>::with_capacity(literals.len());
    for &literal in literals {
        let key = naming::enum_key(literal);
        match values.get(&key) {
            Some(first) if first == literal => {}
            Some(first) => {
                return Err(ConvertError::EnumKeyCollision {
                    path: qualified.to_string(),
                    key,
                    first: first.clone(),
                    second: literal.to_string(),
                });
            }
            None => {
                values.insert(key, literal.to_string());
            }
        }
    }

    let members = values
        .iter()
        .map(|(name, value)| EnumMember { name: name.clone(), value: value.clone() })
        .collect();
    let ty = EnumType::new(
        naming::type_name(qualified),
        qualified.to_string(),
        description.map(str::to_string),
        members,
    );
    debug!(path = qualified, name = ty.name(), members = values.len(), "built enum");
    Ok(registry.register_enum(qualified, Rc::new(ty), values.into_iter().collect()))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NodeKind, SchemaNode};
    use serde_json::json;

    fn enum_schema(value: Value) -> EnumSchema {
        match SchemaNode::from_value(value).unwrap().kind {
            NodeKind::Enum(e) => e,
            other => panic!("not an enum: {other:?}"),
        }
    }

    #[test]
    fn keys_round_trip_to_literals() {
        let mut registry = Registry::new();
        let ty = build(&mut registry, "Filter.op", &["<", "<=", ">=", ">", "3x", "a b"], None).unwrap();
        assert_eq!(ty.name(), "FilterOp");
        let keys = ty.members().iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["LT", "LTE", "GTE", "GT", "VALUE_3x", "a_b"]);

        let values = registry.enum_values("Filter.op").unwrap();
        for member in ty.members() {
            assert_eq!(values.get(&member.name), Some(member.value.as_str()));
            assert_eq!(ty.value_of(&member.name), Some(member.value.as_str()));
        }
    }

    #[test]
    fn repeated_literals_collapse() {
        let mut registry = Registry::new();
        let ty = build(&mut registry, "T.x", &["a", "b", "a"], None).unwrap();
        assert_eq!(ty.members().len(), 2);
    }

    #[test]
    fn sanitized_collisions_fail() {
        let mut registry = Registry::new();
        let err = build(&mut registry, "T.x", &["a.b", "a_b"], None).unwrap_err();
        match err {
            ConvertError::EnumKeyCollision { key, first, second, .. } => {
                assert_eq!(key, "a_b");
                assert_eq!(first, "a.b");
                assert_eq!(second, "a_b");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.enum_type("T.x").is_none());
    }

    #[test]
    fn same_path_returns_same_enum() {
        let mut registry = Registry::new();
        let schema = enum_schema(json!({ "type": "string", "enum": ["on", "off"] }));
        let first = map_enum(&mut registry, &schema, None, "Switch.state").unwrap();
        let second = map_enum(&mut registry, &schema, None, "Switch.state").unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        // a different literal set at the same path keeps the first registration
        let other = enum_schema(json!({ "type": "string", "enum": ["up", "down"] }));
        let third = map_enum(&mut registry, &other, None, "Switch.state").unwrap();
        assert!(Rc::ptr_eq(&first, &third));
        assert_eq!(registry.enum_values("Switch.state").unwrap().get("on"), Some("on"));
    }

    #[test]
    fn non_string_enums_are_rejected() {
        let mut registry = Registry::new();
        let schema = enum_schema(json!({ "type": "integer", "enum": [1, 2] }));
        let err = map_enum(&mut registry, &schema, None, "T.n").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEnumBaseType { ref found, .. } if found == "integer"));

        let schema = enum_schema(json!({ "enum": ["a"] }));
        assert!(map_enum(&mut registry, &schema, None, "T.untyped").is_err());

        let schema = enum_schema(json!({ "type": "string", "enum": ["a", 1] }));
        let err = map_enum(&mut registry, &schema, None, "T.mixed").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEnumBaseType { ref found, .. } if found == "number literal"));
    }
}
