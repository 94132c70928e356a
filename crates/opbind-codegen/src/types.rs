//! Type inspection helpers over `syn` syntax

use opbind_domain::normalize_type_name;
use quote::ToTokens;
use syn::{GenericArgument, PathArguments, ReturnType, Type, TypePath};

/// Normalized text of a type, as recorded in signatures
pub fn type_name(ty: &Type) -> String {
    normalize_type_name(&ty.to_token_stream().to_string())
}

/// Strip any number of enclosing parentheses
pub fn ungroup(ty: &Type) -> &Type {
    match ty {
        Type::Paren(inner) => ungroup(&inner.elem),
        Type::Group(inner) => ungroup(&inner.elem),
        other => other,
    }
}

/// Whether `ty` is the unit type `()`
pub fn is_unit(ty: &Type) -> bool {
    matches!(ungroup(ty), Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn type_path(ty: &Type) -> Option<&TypePath> {
    match ungroup(ty) {
        Type::Path(path) if path.qself.is_none() => Some(path),
        _ => None,
    }
}

/// Identifier of the last path segment (`Arc` for `std::sync::Arc<T>`)
pub fn last_segment_name(ty: &Type) -> Option<String> {
    type_path(ty)
        .and_then(|p| p.path.segments.last())
        .map(|s| s.ident.to_string())
}

/// Type arguments of the last path segment
pub fn type_arguments(ty: &Type) -> Vec<&Type> {
    let Some(segment) = type_path(ty).and_then(|p| p.path.segments.last()) else {
        return Vec::new();
    };
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `T` when `ty` is `Wrapper<T>` for the named wrapper
pub fn unwrap_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if last_segment_name(ty).as_deref() != Some(wrapper) {
        return None;
    }
    match type_arguments(ty).as_slice() {
        [inner] => Some(*inner),
        _ => None,
    }
}

/// `(T, E)` when `ty` is `Result<T, E>`
pub fn result_parts(ty: &Type) -> Option<(&Type, &Type)> {
    if last_segment_name(ty).as_deref() != Some("Result") {
        return None;
    }
    match type_arguments(ty).as_slice() {
        [ok, err] => Some((*ok, *err)),
        _ => None,
    }
}

/// Whether the return type is spelled as a `Result`
///
/// One-argument aliases such as `io::Result<T>` count.
pub fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => last_segment_name(ty).as_deref() == Some("Result"),
    }
}

/// Shape of a declared return
#[derive(Debug, Clone)]
pub struct ReturnSpec {
    /// Whether the body yields a `Result` whose error must be surfaced
    pub fallible: bool,
    /// Value type carried by the return, after removing `Result`
    pub value: Option<Type>,
}

impl ReturnSpec {
    /// Analyse a declared return type
    pub fn from_output(output: &ReturnType) -> Self {
        let ReturnType::Type(_, ty) = output else {
            return Self {
                fallible: false,
                value: None,
            };
        };
        if is_unit(ty) {
            return Self {
                fallible: false,
                value: None,
            };
        }
        if let Some((ok, _)) = result_parts(ty) {
            return Self {
                fallible: true,
                value: (!is_unit(ok)).then(|| ok.clone()),
            };
        }
        if last_segment_name(ty).as_deref() == Some("Result") {
            let value = type_arguments(ty).first().map(|ok| (*ok).clone());
            return Self {
                fallible: true,
                value: value.filter(|ok| !is_unit(ok)),
            };
        }
        Self {
            fallible: false,
            value: Some((**ty).clone()),
        }
    }

    /// Whether a value is returned
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}
