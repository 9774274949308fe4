//! GraphQL SDL rendering of a registry.
//!
//! Printing resolves everything that is still deferred first, so a broken reference
//! deep inside a document surfaces here as an error instead of as missing text.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::error::{ConvertError, Result};
use crate::registry::Registry;
use crate::types::{EnumType, FieldMap, Mode, TypeNode};

/// Every named type in the registry, each once: output types, then input types,
/// then enums that are only reachable through fields. Two types built at different
/// paths but sharing a name (enum `X.a_b` and enum `X.a.b` are both `XAB`) fail.
pub fn print_registry(registry: &mut Registry) -> Result<String> {
    registry.resolve_all()?;

    let mut named: Vec<TypeNode> = Vec::new();
    for mode in Mode::ALL {
        named.extend(registry.types(mode).map(|(_, ty)| ty.named_type().clone()));
    }
    named.extend(registry.enum_types().map(|(_, ty)| TypeNode::Enum(ty.clone())));

    // name → path it was built at; scalars have no path and are not printed
    let mut seen = IndexMap::<String, String>::new();
    let mut blocks = Vec::new();
    for ty in named {
        let (Some(name), Some(path)) = (ty.name(), ty.path()) else { continue };
        match seen.get(name) {
            Some(first) if first == path => continue,
            Some(first) => {
                return Err(ConvertError::TypeNameCollision {
                    name: name.to_string(),
                    first: first.clone(),
                    second: path.to_string(),
                });
            }
            None => {
                seen.insert(name.to_string(), path.to_string());
            }
        }
        blocks.push(print_named(&ty, registry)?);
    }
    Ok(blocks.join("\n"))
}

fn print_named(ty: &TypeNode, registry: &mut Registry) -> Result<String> {
    let mut out = String::new();
    match ty {
        TypeNode::Object(o) => {
            description(&mut out, o.description(), "");
            let fields = o.fields(registry)?;
            print_fields(&mut out, "type", o.name(), fields);
        }
        TypeNode::InputObject(o) => {
            description(&mut out, o.description(), "");
            let fields = o.fields(registry)?;
            print_fields(&mut out, "input", o.name(), fields);
        }
        TypeNode::Enum(e) => print_enum(&mut out, e),
        TypeNode::Union(u) => {
            description(&mut out, u.description(), "");
            let members = u.members(registry)?;
            let members = members.iter().map(|m| m.name()).collect::<Vec<_>>().join(" | ");
            let _ = writeln!(out, "union {} = {members}", u.name());
        }
        TypeNode::Scalar(_) | TypeNode::List(_) | TypeNode::NonNull(_) => {}
    }
    Ok(out)
}

fn print_fields(out: &mut String, keyword: &str, name: &str, fields: &FieldMap) {
    let _ = writeln!(out, "{keyword} {name} {{");
    for (field, def) in fields {
        description(out, def.description.as_deref(), "  ");
        let _ = writeln!(out, "  {field}: {}", def.ty);
    }
    out.push_str("}\n");
}

fn print_enum(out: &mut String, ty: &EnumType) {
    description(out, ty.description(), "");
    let _ = writeln!(out, "enum {} {{", ty.name());
    for member in ty.members() {
        let _ = writeln!(out, "  {}", member.name);
    }
    out.push_str("}\n");
}

fn description(out: &mut String, text: Option<&str>, indent: &str) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else { return };
    let _ = writeln!(out, "{indent}\"\"\"");
    for line in text.replace("\"\"\"", "\\\"\"\"").lines() {
        let _ = writeln!(out, "{indent}{line}");
    }
    let _ = writeln!(out, "{indent}\"\"\"");
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::schema::SchemaDocument;
    use serde_json::json;

    #[test]
    fn prints_every_named_type_once() {
        let mut registry = Registry::new();
        let doc = SchemaDocument::from_value(json!({
            "id": "person",
            "type": "object",
            "description": "Somebody",
            "properties": {
                "name": { "type": "string", "description": "Full name" },
                "role": { "type": "string", "enum": ["admin", "guest"] },
                "pet": { "$ref": "#/definitions/pet" },
                "scores": { "type": "array", "items": { "type": "integer" } }
            },
            "required": ["name"],
            "definitions": {
                "cat": { "type": "object", "properties": { "lives": { "type": "integer" } } },
                "pet": { "switch": [{ "then": { "$ref": "#/definitions/cat" } }] }
            }
        }))
        .unwrap();
        convert(&mut registry, &doc).unwrap();

        let sdl = print_registry(&mut registry).unwrap();
        assert!(sdl.contains("\"\"\"\nSomebody\n\"\"\"\ntype Person {\n"));
        assert!(sdl.contains("  \"\"\"\n  Full name\n  \"\"\"\n  name: String!\n"));
        assert!(sdl.contains("  role: PersonRole\n"));
        assert!(sdl.contains("  pet: Pet\n"));
        assert!(sdl.contains("  scores: [Int!]\n"));
        assert!(sdl.contains("union Pet = Cat\n"));
        assert!(sdl.contains("input PersonInput {\n"));
        assert!(sdl.contains("enum PersonRole {\n  admin\n  guest\n}\n"));
        assert_eq!(sdl.matches("enum PersonRole").count(), 1);
        assert_eq!(sdl.matches("type Person ").count(), 1);

        // the union-typed field has no input form
        let input = &sdl[sdl.find("input PersonInput").unwrap()..];
        let input = &input[..input.find('}').unwrap()];
        assert!(!input.contains("pet"));
    }

    #[test]
    fn enums_sharing_a_name_fail_printing() {
        let mut registry = Registry::new();
        let doc = SchemaDocument::from_value(json!({
            "id": "x",
            "type": "object",
            "properties": {
                "a_b": { "type": "string", "enum": ["p"] },
                "a": { "type": "object", "properties": { "b": { "type": "string", "enum": ["q"] } } }
            }
        }))
        .unwrap();
        convert(&mut registry, &doc).unwrap();
        let err = print_registry(&mut registry).unwrap_err();
        match err {
            ConvertError::TypeNameCollision { name, first, second } => {
                assert_eq!(name, "XAB");
                assert_eq!(first, "X.a_b");
                assert_eq!(second, "X.a.b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn deferred_errors_fail_printing() {
        let mut registry = Registry::new();
        let doc = SchemaDocument::from_value(json!({
            "id": "broken",
            "type": "object",
            "properties": { "x": { "$ref": "#/definitions/nowhere" } }
        }))
        .unwrap();
        convert(&mut registry, &doc).unwrap();
        assert!(print_registry(&mut registry).is_err());
    }
}
