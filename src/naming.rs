//! Canonical names derived from qualified schema paths.
//!
//! A qualified path is the dotted trail built while descending a document
//! (`Person.address.street`). Type names are its upper-camel-cased form
//! (`PersonAddressStreet`); input variants append [`INPUT_SUFFIX`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Mode;

// ------------------------------- Policy ---------------------------------- //

pub const INPUT_SUFFIX: &str = "Input";
pub const ITEM_SUFFIX: &str = "Item";
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Field used for objects that would otherwise have none.
pub const PLACEHOLDER_FIELD: &str = "_empty_";

/// Prefix for enum keys whose literal starts with a digit.
const LEADING_DIGIT_PREFIX: &str = "VALUE_";

static NON_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static pattern"));

// ------------------------------ Type names -------------------------------- //

/// `person.home_address` → `PersonHomeAddress`.
///
/// Word boundaries are any non-alphanumeric characters; only the first letter of
/// each word is touched so existing camel humps survive. A result that would start
/// with a digit gets a leading underscore.
pub fn type_name(qualified: &str) -> String {
    let mut out = String::with_capacity(qualified.len());
    for word in qualified.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Registry key / external name for the node built at `qualified` in `mode`.
pub fn canonical_name(qualified: &str, mode: Mode) -> String {
    let base = type_name(qualified);
    match mode {
        Mode::Output => base,
        Mode::Input => input_name(&base),
    }
}

pub fn input_name(name: &str) -> String {
    format!("{name}{INPUT_SUFFIX}")
}

/// Canonical name for a document identifier such as `person`,
/// `https://example.com/schemas/person.json` or `urn:example:person#`.
///
/// Only the last path segment counts and a trailing `.json` is ignored.
pub fn document_type_name(id: &str) -> Option<String> {
    let trimmed = id.trim().trim_end_matches('#');
    let last = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .find(|segment| !segment.is_empty())?;
    let stem = last.strip_suffix(".json").unwrap_or(last);
    let name = type_name(stem);
    (!name.is_empty()).then_some(name)
}

// ------------------------------ Paths ------------------------------------ //

pub fn field_path(parent: &str, field: &str) -> String {
    format!("{parent}.{field}")
}

pub fn item_path(parent: &str) -> String {
    format!("{parent}{ITEM_SUFFIX}")
}

pub fn branch_path(union: &str, index: usize) -> String {
    format!("{union}.branch{index}")
}

/// `#/definitions/user_role` → `UserRole`, the qualified name the definition was
/// registered under. Anything that is not a local definitions pointer is `None`.
pub fn reference_name(pointer: &str) -> Option<String> {
    let name = pointer.strip_prefix(DEFINITIONS_PREFIX)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(type_name(name))
}

// ------------------------------ Enum keys -------------------------------- //

/// Member name a GraphQL-like enum can carry for `literal`.
///
/// Not injective: `a.b` and `a_b` both become `a_b`. The enum builder checks for that.
pub fn enum_key(literal: &str) -> String {
    match literal {
        "<" => return "LT".to_string(),
        "<=" => return "LTE".to_string(),
        ">=" => return "GTE".to_string(),
        ">" => return "GT".to_string(),
        _ => {}
    }
    if literal.starts_with(|c: char| c.is_ascii_digit()) {
        // the prefix already makes the key a valid name
        let rest = NON_NAME_CHARS.replace_all(literal, "_");
        return format!("{LEADING_DIGIT_PREFIX}{rest}");
    }
    NON_NAME_CHARS.replace_all(literal, "_").into_owned()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_camel_case_dotted_paths() {
        assert_eq!(type_name("person"), "Person");
        assert_eq!(type_name("Person.homeAddress"), "PersonHomeAddress");
        assert_eq!(type_name("Person.tagsItem"), "PersonTagsItem");
        assert_eq!(type_name("user_role"), "UserRole");
        assert_eq!(type_name("3d-model"), "_3dModel");
    }

    #[test]
    fn input_variant_is_suffixed() {
        assert_eq!(canonical_name("Person.address", Mode::Output), "PersonAddress");
        assert_eq!(canonical_name("Person.address", Mode::Input), "PersonAddressInput");
    }

    #[test]
    fn document_ids_use_last_segment() {
        assert_eq!(document_type_name("person").as_deref(), Some("Person"));
        assert_eq!(
            document_type_name("https://example.com/schemas/blog-post.json").as_deref(),
            Some("BlogPost")
        );
        assert_eq!(document_type_name("urn:example:order#").as_deref(), Some("Order"));
        assert_eq!(document_type_name("   "), None);
        assert_eq!(document_type_name("///"), None);
    }

    #[test]
    fn references_resolve_local_definitions_only() {
        assert_eq!(reference_name("#/definitions/user_role").as_deref(), Some("UserRole"));
        assert_eq!(reference_name("#/definitions/"), None);
        assert_eq!(reference_name("#/definitions/a/b"), None);
        assert_eq!(reference_name("other.json#/definitions/A"), None);
    }

    #[test]
    fn enum_keys() {
        assert_eq!(enum_key("<"), "LT");
        assert_eq!(enum_key("<="), "LTE");
        assert_eq!(enum_key(">="), "GTE");
        assert_eq!(enum_key(">"), "GT");
        assert_eq!(enum_key("3x"), "VALUE_3x");
        assert_eq!(enum_key("1.5"), "VALUE_1_5");
        assert_eq!(enum_key("a b"), "a_b");
        assert_eq!(enum_key("in-progress"), "in_progress");
        assert_eq!(enum_key("ACTIVE"), "ACTIVE");
    }
}
