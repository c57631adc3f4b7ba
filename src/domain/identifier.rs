//! Identifier sanitization for generated cursor exports.
//!
//! Wiki titles are arbitrary human-readable strings. Every generated export
//! needs a deterministic camelCase identifier that is valid in the target
//! source language.

/// JavaScript and TypeScript reserved words that cannot be used as
/// `export const` identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "arguments",
    "await",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "double",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "function",
    "goto",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "int",
    "interface",
    "let",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "volatile",
    "while",
    "with",
    "yield",
];

/// Check whether a name is in the reserved word set
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Convert a wiki title into a camelCase identifier.
///
/// `+` becomes `Plus`, `&` becomes `And`, punctuation is stripped and the
/// remaining words are joined in camelCase. Reserved words are prefixed with
/// `_`. The result may still start with a digit or be empty; callers that
/// emit code apply [`export_identifier`] on top of this.
pub fn sanitize_identifier(title: &str) -> String {
    let replaced = title.replace('+', "Plus").replace('&', "And");

    let cleaned: String = replaced
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '(' | ')' | '.' | ','))
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    let mut name = String::with_capacity(cleaned.len());
    let words = cleaned
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty());

    for (index, word) in words.enumerate() {
        if index == 0 {
            name.push_str(&word.to_ascii_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }

    if is_reserved(&name) {
        name.insert(0, '_');
    }

    name
}

/// Sanitize a raw key into the identifier that code generation emits.
///
/// Identifiers starting with a digit, and empty identifiers, get a leading
/// `_`. This is the post-step applied on top of [`sanitize_identifier`].
pub fn export_identifier(raw_key: &str) -> String {
    let name = sanitize_identifier(raw_key);
    let needs_prefix = name
        .chars()
        .next()
        .map_or(true, |c| c.is_ascii_digit());

    if needs_prefix {
        format!("_{}", name)
    } else {
        name
    }
}
