//! Schema document → output/input type graphs.
//!
//! One document is converted in three steps:
//! 1. every named definition is mapped twice, output graph first, then input graph,
//!    and registered under its canonical name;
//! 2. the root is mapped once per graph (a `switch` root only gets an output union);
//! 3. the roots are registered under the document's canonical name.
//!
//! Objects and unions are named shells whose contents resolve on first access, so
//! definitions can reference each other in any order, cycles included.
pub mod enums;
pub mod fields;
pub mod mapper;

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::naming;
use crate::registry::Registry;
use crate::schema::{NodeKind, SchemaDocument, SchemaNode, UnionSchema};
use crate::types::{Mode, ObjectType, TypeNode};

pub use mapper::{Mapped, map};

/// The two roots of one converted document.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// canonical name derived from the document identifier
    pub name: String,
    pub output: TypeNode,
    /// `None` for union documents
    pub input: Option<TypeNode>,
}

// ------------------------------- Front API -------------------------------- //

pub fn convert(registry: &mut Registry, document: &SchemaDocument) -> Result<Conversion> {
    let id = document.id.as_deref().ok_or(ConvertError::MissingTopLevelIdentifier)?;
    let name = naming::document_type_name(id).ok_or(ConvertError::MissingTopLevelIdentifier)?;

    register_definitions(registry, &document.definitions)?;
    // a definition named like the document would otherwise hand the root its shell
    registry.claim(&name, id)?;

    let (output, input) = match &document.root.kind {
        NodeKind::Union(_) => (mapper::map_output(registry, &document.root, &name)?, None),
        _ => {
            let output = mapper::map_output(registry, &document.root, &name)?;
            let input = map(registry, &document.root, &name, Mode::Input)?.into_type();
            (output, input)
        }
    };

    let output = registry.register(Mode::Output, naming::canonical_name(&name, Mode::Output), output);
    let input = input.map(|input| registry.register(Mode::Input, naming::canonical_name(&name, Mode::Input), input));
    debug!(%name, has_input = input.is_some(), "converted document");

    Ok(Conversion { name, output, input })
}

/// Maps every definition in both graphs, output first, and registers the results
/// under the definition's canonical name. Two definitions whose names camel-case
/// alike (`a_b`, `a.b`) are a [`ConvertError::TypeNameCollision`].
pub fn register_definitions(registry: &mut Registry, definitions: &IndexMap<String, SchemaNode>) -> Result<()> {
    for name in definitions.keys() {
        registry.claim(&naming::type_name(name), &format!("{}{name}", naming::DEFINITIONS_PREFIX))?;
    }
    for mode in Mode::ALL {
        for (name, node) in definitions {
            let qualified = naming::type_name(name);
            match map(registry, node, &qualified, mode)? {
                Mapped::Type(ty) => {
                    debug!(definition = %name, ?mode, "registered definition");
                    registry.register(mode, naming::canonical_name(&qualified, mode), ty);
                }
                Mapped::Drop => debug!(definition = %name, "no input form"),
            }
        }
    }
    Ok(())
}

/// Member list of the union built at `qualified`: each branch body mapped as an
/// output type. Every member has to be an object type.
pub(crate) fn resolve_union_members(
    registry: &mut Registry,
    schema: &UnionSchema,
    qualified: &str,
    union_name: &str,
) -> Result<Vec<Rc<ObjectType>>> {
    schema
        .branches
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            match mapper::map_output(registry, branch, &naming::branch_path(qualified, i))? {
                TypeNode::Object(member) => Ok(member),
                other => Err(ConvertError::UnionMemberNotObject {
                    union: union_name.to_string(),
                    member: other.to_string(),
                }),
            }
        })
        .collect()
}

/// Owns a registry across several documents.
#[derive(Debug, Default)]
pub struct Converter {
    registry: Registry,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn convert(&mut self, document: &SchemaDocument) -> Result<Conversion> {
        convert(&mut self.registry, document)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Resolves everything still deferred and hands the registry over.
    pub fn finish(mut self) -> Result<Registry> {
        self.registry.resolve_all()?;
        Ok(self.registry)
    }
}

// ------------------------------- Tests ------------------------------------ //
