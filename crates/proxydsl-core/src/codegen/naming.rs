//! Naming convention utilities for code generation.
//!
//! Java setter, getter, and class names are turned into the Kotlin
//! identifiers used by the generated builders.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `setPort` | [`property_from_setter`] | `port` |
//! | `setRegExp` + boolean | [`getter_name`] | `isRegExp` |
//! | `getPort` / `isRegExp` | [`parameter_name`] | `port` / `isRegExp` |
//! | `HTTPClient` | [`type_to_property_name`] | `httpClient` |
//! | `RewriteInterceptor` + `Map` | [`generated_type_name`] | `RewriteInterceptorMapSpec` |

/// Suffix appended to every generated builder type.
pub const SPEC_SUFFIX: &str = "Spec";

/// Kotlin hard keywords; these need backticks when used as identifiers.
const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use proxydsl_core::codegen::naming::capitalize;
///
/// assert_eq!(capitalize("router"), "Router");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first letter of a string.
///
/// # Examples
///
/// ```
/// use proxydsl_core::codegen::naming::decapitalize;
///
/// assert_eq!(decapitalize("Port"), "port");
/// assert_eq!(decapitalize("URL"), "uRL");
/// ```
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Property name written by a `setXxx` method, or `None` for non-setters.
pub fn property_from_setter(setter: &str) -> Option<String> {
    let rest = setter.strip_prefix("set")?;
    if rest.is_empty() || !is_identifier(rest) {
        return None;
    }
    Some(decapitalize(rest))
}

/// Getter paired with a setter: `is` for primitive booleans, `get` otherwise.
pub fn getter_name(setter: &str, primitive_boolean: bool) -> String {
    let prefix = if primitive_boolean { "is" } else { "get" };
    format!("{prefix}{}", setter.strip_prefix("set").unwrap_or(setter))
}

/// Builder parameter name derived from a getter.
///
/// Only `get` is stripped, so boolean parameters keep their `is` prefix.
pub fn parameter_name(getter: &str) -> String {
    decapitalize(getter.strip_prefix("get").unwrap_or(getter))
}

/// Lower camel case name for an instance of a class.
///
/// A leading run of capitals is treated as an acronym and lowered as a
/// whole, except for its last letter when that starts the next word.
///
/// # Examples
///
/// ```
/// use proxydsl_core::codegen::naming::type_to_property_name;
///
/// assert_eq!(type_to_property_name("ServiceProxy"), "serviceProxy");
/// assert_eq!(type_to_property_name("HTTPClient"), "httpClient");
/// assert_eq!(type_to_property_name("URL"), "url");
/// ```
pub fn type_to_property_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    match chars.iter().position(|c| c.is_lowercase()) {
        None => name.to_lowercase(),
        Some(0) | Some(1) => decapitalize(name),
        Some(first_lower) => {
            let acronym_end = first_lower - 1;
            let head: String = chars[..acronym_end].iter().collect();
            let tail: String = chars[acronym_end..].iter().collect();
            head.to_lowercase() + &tail
        }
    }
}

/// Name of the builder type generated for a class.
pub fn generated_type_name(enclosing: Option<&str>, simple_name: &str) -> String {
    format!("{}{simple_name}{SPEC_SUFFIX}", enclosing.unwrap_or_default())
}

/// Whether `s` is a plain Java/Kotlin identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Escape a Kotlin keyword with backticks.
///
/// # Examples
///
/// ```
/// use proxydsl_core::codegen::naming::escape_identifier;
///
/// assert_eq!(escape_identifier("in"), "`in`");
/// assert_eq!(escape_identifier("port"), "port");
/// ```
pub fn escape_identifier(name: &str) -> String {
    if KOTLIN_KEYWORDS.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn capitalize___capitalizes_first_letter() {
        assert_eq!(capitalize("hello"), "Hello");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn capitalize___preserves_rest_of_string() {
        assert_eq!(capitalize("serviceProxy"), "ServiceProxy");
        assert_eq!(capitalize("ALLCAPS"), "ALLCAPS");
    }

    #[test]
    fn decapitalize___lowers_only_first_letter() {
        assert_eq!(decapitalize("Interceptors"), "interceptors");
        assert_eq!(decapitalize("RegExp"), "regExp");
        assert_eq!(decapitalize(""), "");
    }

    #[test_case("setPort", Some("port"))]
    #[test_case("setRegExp", Some("regExp"))]
    #[test_case("setInterceptors", Some("interceptors"))]
    #[test_case("set", None ; "bare prefix")]
    #[test_case("addRule", None ; "not a setter")]
    #[test_case("set-x", None ; "invalid identifier")]
    fn property_from_setter___strips_prefix(setter: &str, expected: Option<&str>) {
        assert_eq!(property_from_setter(setter).as_deref(), expected);
    }

    #[test_case("setRegExp", true, "isRegExp")]
    #[test_case("setPort", false, "getPort")]
    #[test_case("setHost", false, "getHost")]
    fn getter_name___uses_is_for_primitive_booleans(setter: &str, boolean: bool, expected: &str) {
        assert_eq!(getter_name(setter, boolean), expected);
    }

    #[test_case("getPort", "port")]
    #[test_case("isRegExp", "isRegExp")]
    #[test_case("getURL", "uRL")]
    fn parameter_name___strips_get_only(getter: &str, expected: &str) {
        assert_eq!(parameter_name(getter), expected);
    }

    #[test_case("ServiceProxy", "serviceProxy")]
    #[test_case("Target", "target")]
    #[test_case("HTTPClient", "httpClient")]
    #[test_case("SSLParser", "sslParser")]
    #[test_case("URL", "url")]
    #[test_case("XMLElement", "xmlElement")]
    #[test_case("A", "a")]
    #[test_case("router", "router")]
    #[test_case("", "")]
    fn type_to_property_name___lowers_leading_acronym(name: &str, expected: &str) {
        assert_eq!(type_to_property_name(name), expected);
    }

    #[test]
    fn generated_type_name___prefixes_enclosing_class() {
        assert_eq!(generated_type_name(None, "Target"), "TargetSpec");
        assert_eq!(
            generated_type_name(Some("RewriteInterceptor"), "Mapping"),
            "RewriteInterceptorMappingSpec"
        );
    }

    #[test]
    fn generated_type_name___same_simple_name_different_enclosing___distinct() {
        let a = generated_type_name(Some("AccessControl"), "Rule");
        let b = generated_type_name(Some("RateLimit"), "Rule");

        assert_ne!(a, b);
    }

    #[test_case("port", true)]
    #[test_case("_private", true)]
    #[test_case("serviceProxy2", true)]
    #[test_case("2fast", false)]
    #[test_case("service-proxy", false)]
    #[test_case("", false)]
    fn is_identifier___validates(s: &str, expected: bool) {
        assert_eq!(is_identifier(s), expected);
    }

    #[test]
    fn escape_identifier___backticks_keywords() {
        assert_eq!(escape_identifier("object"), "`object`");
        assert_eq!(escape_identifier("when"), "`when`");
        assert_eq!(escape_identifier("target"), "target");
    }

    proptest! {
        #[test]
        fn proptest_type_to_property_name_keeps_length(name in "[A-Z][A-Za-z0-9]{0,20}") {
            prop_assert_eq!(type_to_property_name(&name).chars().count(), name.chars().count());
        }

        #[test]
        fn proptest_type_to_property_name_starts_lowercase(name in "[A-Z][A-Za-z]{0,20}") {
            let property = type_to_property_name(&name);
            prop_assert!(property.chars().next().is_some_and(|c| c.is_lowercase()));
        }

        #[test]
        fn proptest_generated_type_name_is_injective_for_plain_names(
            enclosing_a in "[A-Z][a-z]{1,8}",
            enclosing_b in "[A-Z][a-z]{1,8}",
            simple in "[A-Z][a-z]{1,8}",
        ) {
            prop_assume!(enclosing_a != enclosing_b);
            prop_assert_ne!(
                generated_type_name(Some(&enclosing_a), &simple),
                generated_type_name(Some(&enclosing_b), &simple)
            );
        }
    }
}
