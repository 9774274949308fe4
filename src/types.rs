// Type nodes produced by a conversion. No serde_json::Value here.
//
// Named composite types are allocated as shells first and resolve their contents
// (fields, union members) on first access. That is what lets a field point at a
// type that is defined later in the document, or at its own owner.

use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use once_cell::unsync::OnceCell;

use crate::error::Result;
use crate::registry::Registry;
use crate::schema::{ObjectSchema, UnionSchema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Which of the two graphs a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// read shapes
    Output,
    /// write shapes
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    String,
    Int,
    Float,
    Boolean,
}

#[derive(Debug, Clone)]
pub enum TypeNode {
    Scalar(Scalar),
    /// elements are always `NonNull`, see [`TypeNode::list_of`]
    List(Box<TypeNode>),
    NonNull(Box<TypeNode>),
    Object(Rc<ObjectType>),
    InputObject(Rc<InputObjectType>),
    Enum(Rc<EnumType>),
    /// output graph only
    Union(Rc<UnionType>),
}

pub type FieldMap = IndexMap<String, Field>;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: TypeNode,
    pub description: Option<String>,
}

pub struct ObjectType {
    shell: Shell,
}

pub struct InputObjectType {
    shell: Shell,
}

/// Shared body of output and input objects; the public types stay distinct.
struct Shell {
    name: String,
    path: String,
    description: Option<String>,
    schema: Rc<ObjectSchema>,
    fields: OnceCell<FieldMap>,
}

#[derive(Debug)]
pub struct EnumType {
    name: String,
    path: String,
    description: Option<String>,
    members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// safe identifier
    pub name: String,
    /// the literal from the schema
    pub value: String,
}

pub struct UnionType {
    name: String,
    path: String,
    description: Option<String>,
    schema: Rc<UnionSchema>,
    members: OnceCell<Vec<Rc<ObjectType>>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Mode {
    /// Definitions are registered in this order.
    pub const ALL: [Mode; 2] = [Mode::Output, Mode::Input];
}

impl Scalar {
    /// `string | integer | number | boolean`; anything else is not a scalar.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "integer" => Some(Self::Int),
            "number" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
        }
    }
}

impl TypeNode {
    pub fn list_of(element: TypeNode) -> Self {
        TypeNode::List(Box::new(element.non_null()))
    }

    pub fn non_null(self) -> Self {
        match self {
            TypeNode::NonNull(_) => self,
            other => TypeNode::NonNull(Box::new(other)),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeNode::NonNull(_))
    }

    /// Strips `List`/`NonNull` wrappers.
    pub fn named_type(&self) -> &TypeNode {
        match self {
            TypeNode::List(inner) | TypeNode::NonNull(inner) => inner.named_type(),
            named => named,
        }
    }

    /// Name of a named node; wrappers have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeNode::Scalar(s) => Some(s.name()),
            TypeNode::Object(o) => Some(o.name()),
            TypeNode::InputObject(o) => Some(o.name()),
            TypeNode::Enum(e) => Some(e.name()),
            TypeNode::Union(u) => Some(u.name()),
            TypeNode::List(_) | TypeNode::NonNull(_) => None,
        }
    }

    /// Qualified path the named node was built at. Scalars have none.
    pub fn path(&self) -> Option<&str> {
        match self {
            TypeNode::Scalar(_) => None,
            TypeNode::Object(o) => Some(o.path()),
            TypeNode::InputObject(o) => Some(o.path()),
            TypeNode::Enum(e) => Some(e.path()),
            TypeNode::Union(u) => Some(u.path()),
            TypeNode::List(inner) | TypeNode::NonNull(inner) => inner.path(),
        }
    }

    pub fn as_object(&self) -> Option<&Rc<ObjectType>> {
        match self {
            TypeNode::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&Rc<InputObjectType>> {
        match self {
            TypeNode::InputObject(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Rc<EnumType>> {
        match self {
            TypeNode::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&Rc<UnionType>> {
        match self {
            TypeNode::Union(u) => Some(u),
            _ => None,
        }
    }
}

/// Named nodes compare by identity, wrappers structurally.
impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeNode::Scalar(a), TypeNode::Scalar(b)) => a == b,
            (TypeNode::List(a), TypeNode::List(b)) => a == b,
            (TypeNode::NonNull(a), TypeNode::NonNull(b)) => a == b,
            (TypeNode::Object(a), TypeNode::Object(b)) => Rc::ptr_eq(a, b),
            (TypeNode::InputObject(a), TypeNode::InputObject(b)) => Rc::ptr_eq(a, b),
            (TypeNode::Enum(a), TypeNode::Enum(b)) => Rc::ptr_eq(a, b),
            (TypeNode::Union(a), TypeNode::Union(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Type-reference syntax: `[String!]!`.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::List(inner) => write!(f, "[{inner}]"),
            TypeNode::NonNull(inner) => write!(f, "{inner}!"),
            named => f.write_str(named.name().unwrap_or_default()),
        }
    }
}

impl Shell {
    fn new(name: String, path: String, description: Option<String>, schema: Rc<ObjectSchema>) -> Self {
        Self { name, path, description, schema, fields: OnceCell::new() }
    }

    fn fields(&self, registry: &mut Registry, mode: Mode) -> Result<&FieldMap> {
        self.fields.get_or_try_init(|| {
            tracing::debug!(type_name = %self.name, ?mode, "resolving fields");
            crate::convert::fields::resolve(registry, &self.schema, &self.path, mode)
        })
    }
}

impl ObjectType {
    pub(crate) fn new(name: String, path: String, description: Option<String>, schema: Rc<ObjectSchema>) -> Self {
        Self { shell: Shell::new(name, path, description, schema) }
    }

    pub fn name(&self) -> &str {
        &self.shell.name
    }

    /// Qualified path the type was built at.
    pub fn path(&self) -> &str {
        &self.shell.path
    }

    pub fn description(&self) -> Option<&str> {
        self.shell.description.as_deref()
    }

    /// Field map, computed on first call and memoized.
    pub fn fields(&self, registry: &mut Registry) -> Result<&FieldMap> {
        self.shell.fields(registry, Mode::Output)
    }

    /// Field map if it has already been computed.
    pub fn resolved_fields(&self) -> Option<&FieldMap> {
        self.shell.fields.get()
    }
}

impl InputObjectType {
    pub(crate) fn new(name: String, path: String, description: Option<String>, schema: Rc<ObjectSchema>) -> Self {
        Self { shell: Shell::new(name, path, description, schema) }
    }

    pub fn name(&self) -> &str {
        &self.shell.name
    }

    pub fn path(&self) -> &str {
        &self.shell.path
    }

    pub fn description(&self) -> Option<&str> {
        self.shell.description.as_deref()
    }

    /// Field map, computed on first call and memoized. Union-typed properties have no key.
    pub fn fields(&self, registry: &mut Registry) -> Result<&FieldMap> {
        self.shell.fields(registry, Mode::Input)
    }

    pub fn resolved_fields(&self) -> Option<&FieldMap> {
        self.shell.fields.get()
    }
}

// Field maps can point back at their owner, so these print the name only.
impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.shell.name)
            .field("resolved", &self.shell.fields.get().is_some())
            .finish()
    }
}

impl fmt::Debug for InputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObjectType")
            .field("name", &self.shell.name)
            .field("resolved", &self.shell.fields.get().is_some())
            .finish()
    }
}

impl EnumType {
    pub(crate) fn new(name: String, path: String, description: Option<String>, members: Vec<EnumMember>) -> Self {
        Self { name, path, description, members }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Original literal carried by member `name`.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.members.iter().find(|m| m.name == name).map(|m| m.value.as_str())
    }

    pub(crate) fn has_literals<'a>(&self, literals: impl IntoIterator<Item = &'a str>) -> bool {
        let literals = literals.into_iter().collect::<IndexSet<_>>();
        literals.len() == self.members.len()
            && literals.iter().zip(&self.members).all(|(l, m)| *l == m.value)
    }
}

impl UnionType {
    pub(crate) fn new(name: String, path: String, description: Option<String>, schema: Rc<UnionSchema>) -> Self {
        Self { name, path, description, schema, members: OnceCell::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Member object types, one per branch, computed on first call and memoized.
    pub fn members(&self, registry: &mut Registry) -> Result<&[Rc<ObjectType>]> {
        let members = self.members.get_or_try_init(|| {
            tracing::debug!(union = %self.name, "resolving members");
            crate::convert::resolve_union_members(registry, &self.schema, &self.path, &self.name)
        })?;
        Ok(members)
    }

    pub fn resolved_members(&self) -> Option<&[Rc<ObjectType>]> {
        self.members.get().map(Vec::as_slice)
    }
}

impl fmt::Debug for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .field("resolved", &self.members.get().is_some())
            .finish()
    }
}

// ------------------------------- Tests ------------------------------------ //
