//! Contract analysis
//!
//! Turns a `#[service_contract]` trait into one [`OperationSpec`] per
//! method: parameter directions, return shape and canonical key.
//!
//! A contract without `namespace = "..."` is declared by its module path,
//! which only the compiler knows. Analysis then names it `self::Trait` and
//! the emitted statics use `module_path!()` instead.

use opbind_domain::{
    CanonicalKey, OperationSignature, ParameterDescriptor, ParameterDirection, ReturnShape,
    canonicalize,
};
use proc_macro2::{Ident, TokenStream};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{FnArg, ItemTrait, LitStr, Pat, TraitItem, TraitItemFn, Type};

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::types::{ReturnSpec, type_name, ungroup};

/// Marker attribute for output-only parameters
pub const OUT_ATTRIBUTE: &str = "out";

/// Arguments of `#[service_contract(...)]`
#[derive(Debug, Clone, Default)]
pub struct ContractAttr {
    /// Namespace of the declaring type; defaults to the module path
    pub namespace: Option<String>,
}

impl ContractAttr {
    /// Parse `namespace = "..."`
    pub fn parse(attr: TokenStream) -> syn::Result<Self> {
        let mut parsed = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("namespace") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.namespace = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported service_contract argument; expected `namespace`"))
            }
        });
        syn::parse::Parser::parse2(parser, attr)?;
        Ok(parsed)
    }
}

/// One analysed parameter
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter identifier
    pub ident: Ident,
    /// Value type, without the `&mut` of `Out`/`InOut` parameters
    pub ty: Type,
    /// Direction of travel
    pub direction: ParameterDirection,
}

/// One analysed contract operation
#[derive(Debug, Clone)]
pub struct OperationSpec {
    /// Method identifier as declared
    pub ident: Ident,
    /// Whether the method is `async`
    pub is_async: bool,
    /// Parameters in declared order, receiver excluded
    pub params: Vec<ParamSpec>,
    /// Declared return
    pub ret: ReturnSpec,
    /// Signature recorded in the generated static
    pub signature: OperationSignature,
    /// Canonical key of `signature`, module-relative without a namespace
    pub key: CanonicalKey,
}

impl OperationSpec {
    /// Return shape of the operation
    pub fn shape(&self) -> ReturnShape {
        self.signature.return_shape
    }
}

/// An analysed contract
#[derive(Debug, Clone)]
pub struct ContractSpec {
    /// Trait identifier
    pub ident: Ident,
    /// Explicit namespace, if any
    pub namespace: Option<String>,
    /// `namespace::Trait`, or `self::Trait` without a namespace
    pub declaring_type: String,
    /// Operations that generate adapters
    pub operations: Vec<OperationSpec>,
    /// Whether any method is `async`
    pub has_async: bool,
    /// Whether the trait can be described at all (non-generic)
    pub supported: bool,
}

/// Result of analysing a contract trait
#[derive(Debug, Clone)]
pub struct ContractAnalysis {
    /// Analysed contract
    pub spec: ContractSpec,
    /// Problems found; offending operations are absent from `spec`
    pub diagnostics: Vec<Diagnostic>,
}

/// Namespace standing in for the module path during analysis
pub const MODULE_NAMESPACE: &str = "self";

/// Analyse a contract trait declared in `namespace`, or in its module
pub fn analyze_contract(item: &ItemTrait, namespace: Option<&str>) -> ContractAnalysis {
    let declaring_type = format!(
        "{}::{}",
        namespace.unwrap_or(MODULE_NAMESPACE),
        item.ident.unraw()
    );
    let mut diagnostics = Vec::new();
    let mut operations = Vec::new();

    let has_async = item
        .items
        .iter()
        .any(|i| matches!(i, TraitItem::Fn(m) if m.sig.asyncness.is_some()));

    let supported = item.generics.params.is_empty();
    if !supported {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::GenericOperation,
            item.generics.span(),
            format!("service contract `{}` must not be generic", item.ident),
        ));
    }

    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) if supported => {
                match analyze_operation(method, &declaring_type) {
                    Ok(op) => operations.push(op),
                    Err(mut found) => diagnostics.append(&mut found),
                }
            }
            TraitItem::Fn(_) | TraitItem::Macro(_) | TraitItem::Verbatim(_) => {}
            other => diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnsupportedItem,
                other.span(),
                "service contracts may only declare methods",
            )),
        }
    }

    ContractAnalysis {
        spec: ContractSpec {
            ident: item.ident.clone(),
            namespace: namespace.map(str::to_string),
            declaring_type,
            operations,
            has_async,
            supported,
        },
        diagnostics,
    }
}

fn analyze_operation(
    method: &TraitItemFn,
    declaring_type: &str,
) -> Result<OperationSpec, Vec<Diagnostic>> {
    let sig = &method.sig;
    let mut diagnostics = Vec::new();

    let receiver_ok = sig
        .receiver()
        .is_some_and(|r| r.reference.is_some() && r.mutability.is_none() && r.colon_token.is_none());
    if !receiver_ok {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::InvalidReceiver,
            sig.span(),
            format!("operation `{}` must take `&self`", sig.ident),
        ));
    }
    if !sig.generics.params.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::GenericOperation,
            sig.generics.span(),
            format!("operation `{}` must not be generic", sig.ident),
        ));
    }

    let mut params = Vec::new();
    for input in &sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        match analyze_param(pat_type) {
            Ok(param) => params.push(param),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let ret = ReturnSpec::from_output(&sig.output);
    let is_async = sig.asyncness.is_some();
    let descriptors = params
        .iter()
        .enumerate()
        .map(|(position, p)| {
            ParameterDescriptor::new(
                p.ident.unraw().to_string(),
                type_name(&p.ty),
                p.direction,
                position,
            )
        })
        .collect();
    let signature = OperationSignature::new(
        declaring_type.to_string(),
        sig.ident.unraw().to_string(),
        descriptors,
        ReturnShape::classify(is_async, ret.has_value()),
    );
    let key = canonicalize(&signature);

    Ok(OperationSpec {
        ident: sig.ident.clone(),
        is_async,
        params,
        ret,
        signature,
        key,
    })
}

/// Whether a parameter carries `#[out]`
pub fn has_out_attribute(pat_type: &syn::PatType) -> bool {
    pat_type
        .attrs
        .iter()
        .any(|a| a.path().is_ident(OUT_ATTRIBUTE))
}

fn analyze_param(pat_type: &syn::PatType) -> Result<ParamSpec, Diagnostic> {
    let ident = match pat_type.pat.as_ref() {
        Pat::Ident(pat) if pat.subpat.is_none() && pat.by_ref.is_none() => pat.ident.clone(),
        other => {
            return Err(Diagnostic::new(
                DiagnosticCode::InvalidPattern,
                other.span(),
                "operation parameters must be plain identifiers",
            ));
        }
    };
    let out = has_out_attribute(pat_type);

    let (ty, direction) = match ungroup(&pat_type.ty) {
        Type::Reference(reference) if reference.mutability.is_some() => {
            let direction = if out {
                ParameterDirection::Out
            } else {
                ParameterDirection::InOut
            };
            ((*reference.elem).clone(), direction)
        }
        Type::Reference(reference) => {
            let (code, message) = if out {
                (DiagnosticCode::InvalidOut, "`#[out]` requires a `&mut T` parameter")
            } else {
                (
                    DiagnosticCode::SharedReference,
                    "operation inputs are owned values; take `T` or `&mut T` instead of `&T`",
                )
            };
            return Err(Diagnostic::new(code, reference.span(), message));
        }
        Type::ImplTrait(impl_trait) => {
            return Err(Diagnostic::new(
                DiagnosticCode::GenericOperation,
                impl_trait.span(),
                "`impl Trait` parameters are not supported in operations",
            ));
        }
        other => {
            if out {
                return Err(Diagnostic::new(
                    DiagnosticCode::InvalidOut,
                    other.span(),
                    "`#[out]` requires a `&mut T` parameter",
                ));
            }
            (other.clone(), ParameterDirection::In)
        }
    };

    Ok(ParamSpec {
        ident,
        ty,
        direction,
    })
}
