//! The mapping registry shared by every step of a conversion.
//!
//! Four insert-only identity maps:
//! - named output types, keyed by canonical name (`Person`)
//! - named input types, keyed by canonical name (`PersonInput`)
//! - enum type nodes, keyed by qualified path (`Person.role`)
//! - enum value maps, keyed by qualified path
//!
//! plus the source (`#/definitions/person` or a document id) that owns each
//! top-level name, so a root and a definition cannot both claim `Person`.
//!
//! An entry is never replaced or removed, so a key always resolves to the first node
//! built for it. Share one registry across documents to deduplicate between them.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{ConvertError, Result};
use crate::types::{EnumType, Mode, TypeNode};

#[derive(Debug, Default)]
pub struct Registry {
    outputs: IndexMap<String, TypeNode>,
    inputs: IndexMap<String, TypeNode>,
    enum_types: IndexMap<String, Rc<EnumType>>,
    enum_maps: IndexMap<String, EnumValueMap>,
    owners: IndexMap<String, String>,
}

/// Safe enum member name → original literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValueMap(IndexMap<String, String>);

impl EnumValueMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for EnumValueMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------ lookups ------------------------------- //

    pub fn get(&self, mode: Mode, name: &str) -> Option<&TypeNode> {
        self.map(mode).get(name)
    }

    pub fn output(&self, name: &str) -> Option<&TypeNode> {
        self.outputs.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&TypeNode> {
        self.inputs.get(name)
    }

    pub fn enum_type(&self, path: &str) -> Option<&Rc<EnumType>> {
        self.enum_types.get(path)
    }

    pub fn enum_values(&self, path: &str) -> Option<&EnumValueMap> {
        self.enum_maps.get(path)
    }

    /// Registered entries of one graph, in registration order.
    pub fn types(&self, mode: Mode) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.map(mode).iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Enum types by qualified path, in registration order.
    pub fn enum_types(&self) -> impl Iterator<Item = (&str, &Rc<EnumType>)> {
        self.enum_types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Source that claimed the top-level qualified name `name`.
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    pub fn len(&self, mode: Mode) -> usize {
        self.map(mode).len()
    }

    fn map(&self, mode: Mode) -> &IndexMap<String, TypeNode> {
        match mode {
            Mode::Output => &self.outputs,
            Mode::Input => &self.inputs,
        }
    }

    // ----------------------------- insertion ------------------------------ //

    /// Insert `ty` under `name` unless the key is taken; returns whatever the key
    /// resolves to afterwards.
    pub(crate) fn register(&mut self, mode: Mode, name: String, ty: TypeNode) -> TypeNode {
        let map = match mode {
            Mode::Output => &mut self.outputs,
            Mode::Input => &mut self.inputs,
        };
        map.entry(name).or_insert(ty).clone()
    }

    pub(crate) fn register_enum(&mut self, path: &str, ty: Rc<EnumType>, values: EnumValueMap) -> Rc<EnumType> {
        self.enum_maps.entry(path.to_string()).or_insert(values);
        self.enum_types.entry(path.to_string()).or_insert(ty).clone()
    }

    /// Record `source` as the owner of the top-level name `name`. Claiming again
    /// from the same source is a no-op, so documents can share definitions and be
    /// converted twice.
    pub(crate) fn claim(&mut self, name: &str, source: &str) -> Result<()> {
        match self.owners.get(name) {
            Some(first) if first == source => Ok(()),
            Some(first) => Err(ConvertError::TypeNameCollision {
                name: name.to_string(),
                first: first.clone(),
                second: source.to_string(),
            }),
            None => {
                self.owners.insert(name.to_string(), source.to_string());
                Ok(())
            }
        }
    }

    // ------------------------------ forcing ------------------------------- //

    /// Resolve every deferred field map and union member list reachable from the
    /// registry. Types created along the way are registered and resolved too, so
    /// on success the whole graph is materialized.
    pub fn resolve_all(&mut self) -> Result<()> {
        for mode in Mode::ALL {
            let mut i = 0;
            // `len` is re-read every round: forcing can register new types
            while let Some(ty) = self.map(mode).get_index(i).map(|(_, ty)| ty.clone()) {
                match ty.named_type() {
                    TypeNode::Object(o) => {
                        o.fields(self)?;
                    }
                    TypeNode::InputObject(o) => {
                        o.fields(self)?;
                    }
                    TypeNode::Union(u) => {
                        u.members(self)?;
                    }
                    TypeNode::Scalar(_) | TypeNode::Enum(_) | TypeNode::List(_) | TypeNode::NonNull(_) => {}
                }
                i += 1;
            }
        }
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //
