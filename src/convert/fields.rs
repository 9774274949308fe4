use tracing::debug;

use super::mapper::{self, Mapped};
use crate::error::Result;
use crate::naming;
use crate::registry::Registry;
use crate::schema::ObjectSchema;
use crate::types::{Field, FieldMap, Mode, Scalar, TypeNode};

/// Field map of the object built at `qualified`.
///
/// Required properties are wrapped `NonNull`, union-typed properties are left out
/// of input objects, and an object left without fields gets a placeholder.
pub fn resolve(registry: &mut Registry, schema: &ObjectSchema, qualified: &str, mode: Mode) -> Result<FieldMap> {
    let mut fields = FieldMap::with_capacity(schema.properties.len());

    for (property, node) in &schema.properties {
        let path = naming::field_path(qualified, property);
        let ty = match mapper::map(registry, node, &path, mode)? {
            Mapped::Type(ty) => ty,
            Mapped::Drop => {
                debug!(%path, "union-typed property has no input form, dropped");
                continue;
            }
        };
        let ty = if schema.is_required(property) { ty.non_null() } else { ty };
        fields.insert(property.clone(), Field { ty, description: node.description.clone() });
    }

    // fieldless object types are not allowed
    if fields.is_empty() {
        fields.insert(
            naming::PLACEHOLDER_FIELD.to_string(),
            Field { ty: TypeNode::Scalar(Scalar::String), description: None },
        );
    }

    Ok(fields)
}
