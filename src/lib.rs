//! JSON-Schema → GraphQL type graphs.
//!
//! Each schema document becomes an output type and an input type, registered under
//! canonical names in a shared [`Registry`]. Fields and union members resolve lazily,
//! so documents may reference each other (and themselves) in any order.
//!
//! ```no_run
//! use jsonschema_gql::{Converter, SchemaDocument};
//!
//! let doc = SchemaDocument::from_str(r#"{ "id": "person", "type": "object" }"#)?;
//! let mut converter = Converter::new();
//! converter.convert(&doc)?;
//! let mut registry = converter.finish()?;
//! println!("{}", jsonschema_gql::sdl::print_registry(&mut registry)?);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
pub mod cli;
pub mod convert;
pub mod emit;
pub mod error;
pub mod jq_exec;
pub mod naming;
pub mod path_de;
pub mod registry;
pub mod schema;
pub mod sdl;
pub mod types;

pub use convert::{Conversion, Converter, convert};
pub use emit::Target;
pub use error::{ConvertError, DocumentError};
pub use registry::Registry;
pub use schema::SchemaDocument;
pub use types::{Mode, TypeNode};
