//! Layer naming convention of the host template compiler.
//!
//! For a declared layer `L` the compiler emits:
//!
//! | Identifier | Form |
//! |------------|------|
//! | Output     | `{PascalCase(L)}LambdaLayerQualifiedArn` |
//! | Logical layer resource | `{PascalCase(L)}LambdaLayer` |
//! | Versioned layer resource | `{PascalCase(L)}LambdaLayer{hash}` (not known in advance) |
//!
//! Lookups only succeed if these names are reproduced exactly, so every
//! identifier the transformer uses comes from [`LayerNames`].

/// Suffix of the logical (pre-versioning) layer resource id.
pub const LOGICAL_SUFFIX: &str = "LambdaLayer";

/// Suffix of the compiled output holding the versioned layer reference.
pub const OUTPUT_SUFFIX: &str = "LambdaLayerQualifiedArn";

/// Convert a declared layer name to PascalCase.
///
/// The name is split on every character that is not ASCII alphanumeric. Each
/// word gets its first character upper-cased; the rest is kept as written, so
/// existing camel humps survive.
///
/// ```
/// use layer_manager::core::pascal_case;
///
/// assert_eq!(pascal_case("foo"), "Foo");
/// assert_eq!(pascal_case("foo-bar"), "FooBar");
/// assert_eq!(pascal_case("my_layer.v2"), "MyLayerV2");
/// assert_eq!(pascal_case("fooBar"), "FooBar");
/// ```
pub fn pascal_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for word in input.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }

    result
}

/// Template identifiers derived from one declared layer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNames {
    /// PascalCase form of the declared name
    pub name: String,
    /// Id of the compiled output, e.g. `FooLambdaLayerQualifiedArn`
    pub output_id: String,
    /// Logical resource id functions reference before the upgrade, e.g. `FooLambdaLayer`
    pub logical_id: String,
}

impl LayerNames {
    /// Derive all identifiers for a declared layer.
    pub fn for_layer(declared: &str) -> Self {
        let name = pascal_case(declared);
        Self {
            output_id: format!("{name}{OUTPUT_SUFFIX}"),
            logical_id: format!("{name}{LOGICAL_SUFFIX}"),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_simple() {
        assert_eq!(pascal_case("foo"), "Foo");
        assert_eq!(pascal_case("Foo"), "Foo");
    }

    #[test]
    fn test_pascal_case_separators() {
        assert_eq!(pascal_case("foo-bar"), "FooBar");
        assert_eq!(pascal_case("foo_bar_baz"), "FooBarBaz");
        assert_eq!(pascal_case("foo bar"), "FooBar");
        assert_eq!(pascal_case("--foo--bar--"), "FooBar");
    }

    #[test]
    fn test_pascal_case_keeps_humps_and_digits() {
        assert_eq!(pascal_case("fooBar"), "FooBar");
        assert_eq!(pascal_case("node-v18"), "NodeV18");
        assert_eq!(pascal_case("2fa"), "2fa");
    }

    #[test]
    fn test_pascal_case_empty() {
        assert_eq!(pascal_case(""), "");
        assert_eq!(pascal_case("---"), "");
    }

    #[test]
    fn test_layer_names() {
        let names = LayerNames::for_layer("shared-deps");
        assert_eq!(names.name, "SharedDeps");
        assert_eq!(names.output_id, "SharedDepsLambdaLayerQualifiedArn");
        assert_eq!(names.logical_id, "SharedDepsLambdaLayer");
    }
}
