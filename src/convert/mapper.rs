//! The recursive type mapper: one schema node in, one type node (or a drop) out.

use std::rc::Rc;

use crate::error::{ConvertError, Result};
use crate::naming;
use crate::registry::Registry;
use crate::schema::{NodeKind, ObjectSchema, SchemaNode, UnionSchema};
use crate::types::{InputObjectType, Mode, ObjectType, Scalar, TypeNode, UnionType};

/// Result of mapping one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    Type(TypeNode),
    /// No input form exists (unions). The owning field or list disappears.
    Drop,
}

impl Mapped {
    pub fn into_type(self) -> Option<TypeNode> {
        match self {
            Mapped::Type(ty) => Some(ty),
            Mapped::Drop => None,
        }
    }
}

pub fn map(registry: &mut Registry, node: &SchemaNode, qualified: &str, mode: Mode) -> Result<Mapped> {
    match &node.kind {
        NodeKind::Array(items) => map_array(registry, items, qualified, mode),
        NodeKind::Object(schema) => map_object(registry, node, schema, qualified, mode).map(Mapped::Type),
        NodeKind::Enum(schema) => {
            let ty = super::enums::map_enum(registry, schema, node.description.as_deref(), qualified)?;
            Ok(Mapped::Type(TypeNode::Enum(ty)))
        }
        NodeKind::Reference(pointer) => map_reference(registry, pointer, qualified, mode),
        NodeKind::Union(schema) => match mode {
            Mode::Output => map_union(registry, node, schema, qualified).map(Mapped::Type),
            Mode::Input => Ok(Mapped::Drop),
        },
        NodeKind::Scalar { keyword } => Scalar::from_keyword(keyword)
            .map(|s| Mapped::Type(TypeNode::Scalar(s)))
            .ok_or_else(|| ConvertError::UnsupportedScalarType {
                path: qualified.to_string(),
                keyword: keyword.clone(),
            }),
    }
}

/// Output mapping never drops.
pub fn map_output(registry: &mut Registry, node: &SchemaNode, qualified: &str) -> Result<TypeNode> {
    match map(registry, node, qualified, Mode::Output)? {
        Mapped::Type(ty) => Ok(ty),
        Mapped::Drop => unreachable!("only input mapping drops"),
    }
}

fn map_array(registry: &mut Registry, items: &SchemaNode, qualified: &str, mode: Mode) -> Result<Mapped> {
    // a referenced item keeps its definition's name; the path is not used for it
    let item_path = if items.is_reference() {
        qualified.to_string()
    } else {
        naming::item_path(qualified)
    };
    Ok(match map(registry, items, &item_path, mode)? {
        Mapped::Type(element) => Mapped::Type(TypeNode::list_of(element)),
        Mapped::Drop => Mapped::Drop,
    })
}

/// Allocates a named shell; its fields are resolved on first access.
fn map_object(
    registry: &mut Registry,
    node: &SchemaNode,
    schema: &Rc<ObjectSchema>,
    qualified: &str,
    mode: Mode,
) -> Result<TypeNode> {
    let name = naming::canonical_name(qualified, mode);
    if let Some(existing) = registry.get(mode, &name) {
        return reuse(existing, &name, qualified);
    }
    let (path, description, schema) = (qualified.to_string(), node.description.clone(), schema.clone());
    let ty = match mode {
        Mode::Output => TypeNode::Object(Rc::new(ObjectType::new(name.clone(), path, description, schema))),
        Mode::Input => TypeNode::InputObject(Rc::new(InputObjectType::new(name.clone(), path, description, schema))),
    };
    Ok(registry.register(mode, name, ty))
}

fn map_union(registry: &mut Registry, node: &SchemaNode, schema: &Rc<UnionSchema>, qualified: &str) -> Result<TypeNode> {
    let name = naming::canonical_name(qualified, Mode::Output);
    if let Some(existing) = registry.output(&name) {
        return reuse(existing, &name, qualified);
    }
    let ty = UnionType::new(name.clone(), qualified.to_string(), node.description.clone(), schema.clone());
    Ok(registry.register(Mode::Output, name, TypeNode::Union(Rc::new(ty))))
}

/// A registered node is only handed out again for the path it was built at;
/// `X.a_b` and `X.a.b` share the name `XAB` but not the node.
fn reuse(existing: &TypeNode, name: &str, qualified: &str) -> Result<TypeNode> {
    match existing.path() {
        Some(path) if path == qualified => Ok(existing.clone()),
        first => Err(ConvertError::TypeNameCollision {
            name: name.to_string(),
            first: first.unwrap_or(name).to_string(),
            second: qualified.to_string(),
        }),
    }
}

fn map_reference(registry: &mut Registry, pointer: &str, qualified: &str, mode: Mode) -> Result<Mapped> {
    let unknown = || ConvertError::UnknownTypeReference {
        path: qualified.to_string(),
        reference: pointer.to_string(),
    };
    let target = naming::reference_name(pointer).ok_or_else(unknown)?;

    if let Some(ty) = registry.get(mode, &naming::canonical_name(&target, mode)) {
        return Ok(Mapped::Type(ty.clone()));
    }
    // unions (and lists of them) only exist in the output graph
    if mode == Mode::Input {
        let output = registry.output(&naming::canonical_name(&target, Mode::Output));
        if matches!(output.map(TypeNode::named_type), Some(TypeNode::Union(_))) {
            return Ok(Mapped::Drop);
        }
    }
    Err(unknown())
}
