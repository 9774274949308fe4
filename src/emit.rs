//! Source text for enum reverse-conversion functions.
//!
//! An enum member travels over the API under its safe name (`VALUE_3x`, `LT`);
//! the emitted function maps it back to the literal the schema declared.

use std::fmt::Write as _;

use crate::error::{ConvertError, Result};
use crate::registry::{EnumValueMap, Registry};
use crate::types::EnumType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Target {
    /// `switch` with one `case` per value and no `default`
    #[default]
    #[value(name = "js")]
    JavaScript,
    /// `match` with one arm per value, unknown input gives `None`
    Rust,
}

/// Converter for the enum registered at `qualified`.
pub fn enum_converter(registry: &Registry, qualified: &str, target: Target) -> Result<String> {
    let (ty, values) = registry
        .enum_type(qualified)
        .zip(registry.enum_values(qualified))
        .ok_or_else(|| ConvertError::UnknownEnumPath { path: qualified.to_string() })?;
    Ok(render(ty, values, target))
}

/// One converter per registered enum, in registration order, blank-line separated.
pub fn all_enum_converters(registry: &Registry, target: Target) -> Result<String> {
    let mut out = String::new();
    for (path, _) in registry.enum_types() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&enum_converter(registry, path, target)?);
    }
    Ok(out)
}

fn render(ty: &EnumType, values: &EnumValueMap, target: Target) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    match target {
        Target::JavaScript => {
            let _ = writeln!(out, "function convert{}FromGraphQL(value) {{", ty.name());
            let _ = writeln!(out, "  switch (value) {{");
            for (key, literal) in values.iter() {
                let _ = writeln!(out, "    case {}: return {};", js_string(key), js_string(literal));
            }
            let _ = writeln!(out, "  }}");
            let _ = writeln!(out, "}}");
        }
        Target::Rust => {
            let _ = writeln!(
                out,
                "pub fn convert_{}_from_graphql(value: &str) -> Option<&'static str> {{",
                snake_case(ty.name())
            );
            let _ = writeln!(out, "    match value {{");
            for (key, literal) in values.iter() {
                let _ = writeln!(out, "        {key:?} => Some({literal:?}),");
            }
            let _ = writeln!(out, "        _ => None,");
            let _ = writeln!(out, "    }}");
            let _ = writeln!(out, "}}");
        }
    }
    out
}

/// Single-quoted JavaScript string literal.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `PersonRole` → `person_role`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::enums;

    fn registry_with_enum() -> Registry {
        let mut registry = Registry::new();
        enums::build(&mut registry, "Filter.op", &["<", "3x", "it's"], None).unwrap();
        registry
    }

    #[test]
    fn javascript_switch_without_default() {
        let registry = registry_with_enum();
        let src = enum_converter(&registry, "Filter.op", Target::JavaScript).unwrap();
        assert_eq!(
            src,
            "function convertFilterOpFromGraphQL(value) {\n\
             \x20 switch (value) {\n\
             \x20   case 'LT': return '<';\n\
             \x20   case 'VALUE_3x': return '3x';\n\
             \x20   case 'it_s': return 'it\\'s';\n\
             \x20 }\n\
             }\n"
        );
        assert_eq!(src.matches("case ").count(), 3);
        assert!(!src.contains("default"));
    }

    #[test]
    fn rust_match() {
        let registry = registry_with_enum();
        let src = enum_converter(&registry, "Filter.op", Target::Rust).unwrap();
        assert!(src.starts_with("pub fn convert_filter_op_from_graphql(value: &str) -> Option<&'static str> {\n"));
        assert!(src.contains("        \"LT\" => Some(\"<\"),\n"));
        assert!(src.contains("        \"it_s\" => Some(\"it's\"),\n"));
        assert!(src.contains("        _ => None,\n"));
    }

    #[test]
    fn unknown_path() {
        let registry = registry_with_enum();
        let err = enum_converter(&registry, "Nope", Target::JavaScript).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownEnumPath { .. }));
    }

    #[test]
    fn all_converters_in_registration_order() {
        let mut registry = registry_with_enum();
        enums::build(&mut registry, "Light.state", &["on", "off"], None).unwrap();
        let src = all_enum_converters(&registry, Target::JavaScript).unwrap();
        let first = src.find("convertFilterOpFromGraphQL").unwrap();
        let second = src.find("convertLightStateFromGraphQL").unwrap();
        assert!(first < second);
        assert!(src.contains("}\n\nfunction"));
    }

    #[test]
    fn snake_case_names() {
        assert_eq!(snake_case("PersonRole"), "person_role");
        assert_eq!(snake_case("_3dModel"), "_3d_model");
        assert_eq!(snake_case("Level"), "level");
    }
}
