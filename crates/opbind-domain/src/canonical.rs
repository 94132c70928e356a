//! Signature canonicalization
//!
//! One function turns an [`OperationSignature`] into its [`CanonicalKey`].
//! The registry calls it to key each linked entry by its signature, and the
//! dispatcher and host call it to find the adapter for an operation. The
//! contract macro also calls it during analysis to report duplicate keys.
//!
//! Key layout:
//!
//! ```text
//! {declaring.Type}.{method}({prefix}{type}, {prefix}{type}, ...)
//! ```
//!
//! where `prefix` is empty for `In`, `out ` for `Out` and `inout ` for
//! `InOut`. Type names are normalized: whitespace is collapsed, well-known
//! standard library paths become their short names, and path separators
//! become `.`. Generic arguments are normalized recursively.

use crate::constants::{KEY_PARAMETER_SEPARATOR, KEY_PATH_SEPARATOR};
use crate::value_objects::{CanonicalKey, OperationSignature};

/// Standard library paths that canonicalize to their short names
const WELL_KNOWN_TYPES: &[(&str, &str)] = &[
    ("std::string::String", "String"),
    ("alloc::string::String", "String"),
    ("std::vec::Vec", "Vec"),
    ("alloc::vec::Vec", "Vec"),
    ("std::option::Option", "Option"),
    ("core::option::Option", "Option"),
    ("std::result::Result", "Result"),
    ("core::result::Result", "Result"),
    ("std::boxed::Box", "Box"),
    ("alloc::boxed::Box", "Box"),
    ("std::sync::Arc", "Arc"),
    ("alloc::sync::Arc", "Arc"),
    ("std::rc::Rc", "Rc"),
    ("alloc::rc::Rc", "Rc"),
    ("std::collections::HashMap", "HashMap"),
    ("std::collections::hash_map::HashMap", "HashMap"),
    ("std::collections::hash::map::HashMap", "HashMap"),
    ("std::collections::HashSet", "HashSet"),
    ("std::collections::hash_set::HashSet", "HashSet"),
    ("std::collections::hash::set::HashSet", "HashSet"),
    ("std::collections::BTreeMap", "BTreeMap"),
    ("alloc::collections::btree::map::BTreeMap", "BTreeMap"),
    ("std::time::Duration", "Duration"),
    ("core::time::Duration", "Duration"),
];

/// Primitive types reachable through `core::primitive` / `std::primitive`
const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64",
];

/// Compute the canonical key of an operation signature
///
/// Pure and total: the same signature always yields the same key and no
/// input makes it fail.
pub fn canonicalize(signature: &OperationSignature) -> CanonicalKey {
    let mut key = normalize_type_name(&signature.declaring_type);
    key.push_str(KEY_PATH_SEPARATOR);
    key.push_str(&signature.method);
    key.push('(');
    for (i, parameter) in signature.parameters.iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_PARAMETER_SEPARATOR);
        }
        key.push_str(parameter.direction.keyword());
        key.push_str(&normalize_type_name(&parameter.type_name));
    }
    key.push(')');
    CanonicalKey::from_canonical(key)
}

/// Normalize a type name as written in source or as reported by the compiler
///
/// Idempotent: normalizing an already normalized name returns it unchanged.
///
/// ```rust
/// use opbind_domain::canonical::normalize_type_name;
///
/// assert_eq!(
///     normalize_type_name("std :: vec :: Vec < alloc::string::String >"),
///     "Vec<String>"
/// );
/// assert_eq!(normalize_type_name("crate::model::Order"), "crate.model.Order");
/// ```
pub fn normalize_type_name(raw: &str) -> String {
    let tokens = tokenize(raw);
    let mut out = String::with_capacity(raw.len());
    let mut previous_word = false;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(_) | Token::PathSep => {
                let (segments, next) = read_path(&tokens, i);
                if tokens[i] == Token::PathSep && out.ends_with('>') {
                    out.push_str(KEY_PATH_SEPARATOR);
                } else if previous_word {
                    out.push(' ');
                }
                out.push_str(&render_path(&segments));
                previous_word = true;
                i = next;
                continue;
            }
            Token::Lifetime(name) => {
                if previous_word {
                    out.push(' ');
                }
                out.push('\'');
                out.push_str(name);
                previous_word = true;
            }
            Token::Arrow => {
                out.push_str(" -> ");
                previous_word = false;
            }
            Token::Punct(c) => {
                match c {
                    ',' => out.push_str(KEY_PARAMETER_SEPARATOR),
                    ';' => out.push_str("; "),
                    '+' => out.push_str(" + "),
                    other => out.push(*other),
                }
                previous_word = false;
            }
        }
        i += 1;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Lifetime(&'a str),
    PathSep,
    Arrow,
    Punct(char),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if is_word_char(c) || c == '\'' {
            let mut end = start + c.len_utf8();
            while let Some(&(idx, next)) = chars.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = idx + next.len_utf8();
                chars.next();
            }
            if c == '\'' {
                tokens.push(Token::Lifetime(&raw[start + 1..end]));
            } else {
                tokens.push(Token::Word(&raw[start..end]));
            }
            continue;
        }
        match c {
            ':' if matches!(chars.peek(), Some(&(_, ':'))) => {
                chars.next();
                tokens.push(Token::PathSep);
            }
            '.' => tokens.push(Token::PathSep),
            '-' if matches!(chars.peek(), Some(&(_, '>'))) => {
                chars.next();
                tokens.push(Token::Arrow);
            }
            other => tokens.push(Token::Punct(other)),
        }
    }
    tokens
}

/// Read `a::b::c` starting at `start`, skipping a leading separator
fn read_path<'a>(tokens: &[Token<'a>], start: usize) -> (Vec<&'a str>, usize) {
    let mut segments = Vec::new();
    let mut i = start;
    let mut expect_word = true;

    while i < tokens.len() {
        match (&tokens[i], expect_word) {
            (Token::Word(w), true) => {
                segments.push(*w);
                expect_word = false;
            }
            (Token::PathSep, _) => expect_word = true,
            _ => break,
        }
        i += 1;
    }
    (segments, i)
}

fn render_path(segments: &[&str]) -> String {
    if let Some(short) = well_known_alias(segments) {
        return short.to_string();
    }
    segments.join(KEY_PATH_SEPARATOR)
}

fn well_known_alias(segments: &[&str]) -> Option<&'static str> {
    if let [root, "primitive", name] = segments
        && matches!(*root, "core" | "std")
    {
        return PRIMITIVES.iter().copied().find(|p| p == name);
    }
    WELL_KNOWN_TYPES
        .iter()
        .find(|(full, _)| path_eq(full, segments))
        .map(|(_, short)| *short)
}

fn path_eq(full: &str, segments: &[&str]) -> bool {
    let mut parts = full.split("::");
    segments.iter().all(|s| parts.next() == Some(*s)) && parts.next().is_none()
}
