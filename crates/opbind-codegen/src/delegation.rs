//! Delegation wrapper synthesis
//!
//! `#[service_impl(Contract)]` on an inherent `impl` block turns every
//! `#[operation]` method into an implementation of the matching contract
//! method. Parameters marked `#[inject]` are removed from the visible
//! signature and resolved per call; all other parameters keep their
//! position, type and direction.
//!
//! ```ignore
//! #[opbind::service_impl(Greeter)]
//! impl GreeterService {
//!     #[operation]
//!     fn greet(
//!         &self,
//!         name: String,
//!         #[inject] clock: Arc<dyn Clock>,
//!         #[inject(property = "tenant")] tenant: Option<String>,
//!     ) -> Result<String, opbind::Error> { .. }
//! }
//! ```

use opbind_domain::ResolutionPlan;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Pat, Path, PatType,
    Signature, Token, Type, parse_quote,
};

use crate::contract::OUT_ATTRIBUTE;
use crate::diagnostic::{self, Diagnostic, DiagnosticCode};
use crate::types::{returns_result, type_name, unwrap_generic};

/// Marker attribute for contract methods in a service implementation
pub const OPERATION_ATTRIBUTE: &str = "operation";

/// Marker attribute for injected parameters
pub const INJECT_ATTRIBUTE: &str = "inject";

/// Attributes copied from an implementation method onto its wrapper
const FORWARDED_ATTRIBUTES: &[&str] = &["cfg", "allow", "deny", "warn", "doc"];

/// One injected parameter and how it is resolved
#[derive(Debug, Clone)]
pub struct InjectedParam {
    /// Parameter identifier
    pub ident: Ident,
    /// Declared type
    pub ty: Type,
    /// Binding rule
    pub plan: ResolutionPlan,
    /// Type passed to the resolution call (`T` of `Arc<T>` or `Option<T>`)
    pub target: Type,
    /// Whether the declared type is an `Option`
    pub optional: bool,
}

/// A parameter of an implementation method
#[derive(Debug, Clone)]
pub enum ImplParam {
    /// A contract parameter forwarded unchanged
    Contract {
        /// Parameter identifier
        ident: Ident,
        /// Declared type
        ty: Type,
    },
    /// A parameter resolved by the wrapper
    Injected(InjectedParam),
}

impl ImplParam {
    /// Parameter identifier
    pub fn ident(&self) -> &Ident {
        match self {
            Self::Contract { ident, .. } => ident,
            Self::Injected(param) => &param.ident,
        }
    }
}

/// An `#[operation]` method that generates a wrapper
#[derive(Debug, Clone)]
pub struct DelegatedOperation {
    /// Method identifier
    pub ident: Ident,
    /// Whether the method is `async`
    pub is_async: bool,
    /// Parameters in declared order, receiver excluded
    pub params: Vec<ImplParam>,
    /// Contract-visible signature of the wrapper
    pub wrapper_sig: Signature,
    /// Attributes copied onto the wrapper
    pub attrs: Vec<Attribute>,
}

impl DelegatedOperation {
    /// Injected parameters in declared order
    pub fn injected(&self) -> impl Iterator<Item = &InjectedParam> {
        self.params.iter().filter_map(|p| match p {
            ImplParam::Injected(param) => Some(param),
            ImplParam::Contract { .. } => None,
        })
    }

    /// Resolution plans in declared order
    pub fn plans(&self) -> Vec<ResolutionPlan> {
        self.injected().map(|p| p.plan.clone()).collect()
    }

    /// Whether any binding can fail at call time
    pub fn is_fallible(&self) -> bool {
        self.injected().any(|p| p.plan.is_fallible())
    }
}

/// Result of analysing a service implementation
#[derive(Debug, Clone, Default)]
pub struct ImplAnalysis {
    /// Operations that generate wrappers
    pub operations: Vec<DelegatedOperation>,
    /// Problems found; offending operations are absent from `operations`
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Default)]
struct InjectArgs {
    key: Option<LitStr>,
    property: Option<LitStr>,
    unknown: Vec<Path>,
}

fn parse_inject_args(attr: &Attribute) -> syn::Result<InjectArgs> {
    let mut args = InjectArgs::default();
    if let Meta::Path(_) = &attr.meta {
        return Ok(args);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
            args.key = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("property") {
            args.property = Some(meta.value()?.parse()?);
        } else {
            if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            args.unknown.push(meta.path.clone());
        }
        Ok(())
    })?;
    Ok(args)
}

fn inject_attribute(pat_type: &PatType) -> Option<&Attribute> {
    pat_type
        .attrs
        .iter()
        .find(|a| a.path().is_ident(INJECT_ATTRIBUTE))
}

fn transport_plan(ty: &Type) -> Option<ResolutionPlan> {
    match crate::types::last_segment_name(ty)?.as_str() {
        "TransportContext" => Some(ResolutionPlan::TransportContext),
        "TransportRequest" => Some(ResolutionPlan::TransportRequest),
        "TransportResponse" => Some(ResolutionPlan::TransportResponse),
        _ => None,
    }
}

/// Build the resolution plan of one `#[inject]` parameter
///
/// Conflicting metadata yields exactly one diagnostic.
fn plan_injection(
    ident: &Ident,
    ty: &Type,
    attr: &Attribute,
) -> Result<InjectedParam, Vec<Diagnostic>> {
    let args = parse_inject_args(attr).map_err(|e| vec![Diagnostic::from(e)])?;

    if let (Some(_), Some(key)) = (&args.property, &args.key) {
        return Err(vec![Diagnostic::new(
            DiagnosticCode::ConflictingBinding,
            key.span(),
            format!("parameter `{ident}` specifies both a message property and a service key"),
        )]);
    }
    if !args.unknown.is_empty() {
        return Err(args
            .unknown
            .iter()
            .map(|path| {
                Diagnostic::new(
                    DiagnosticCode::UnknownInjectArgument,
                    path.span(),
                    format!(
                        "unknown inject argument `{}`; expected `key` or `property`",
                        quote!(#path)
                    ),
                )
            })
            .collect());
    }

    if let Some(property) = &args.property {
        let name = property.value();
        if name.trim().is_empty() {
            return Err(vec![Diagnostic::new(
                DiagnosticCode::EmptyPropertyName,
                property.span(),
                format!("message property name of `{ident}` must not be empty"),
            )]);
        }
        let (target, optional) = match unwrap_generic(ty, "Option") {
            Some(inner) => (inner.clone(), true),
            None => (ty.clone(), false),
        };
        return Ok(InjectedParam {
            ident: ident.clone(),
            ty: ty.clone(),
            plan: ResolutionPlan::MessageProperty {
                name: name.into(),
                type_name: type_name(&target).into(),
            },
            target,
            optional,
        });
    }

    if args.key.is_none()
        && let Some(plan) = transport_plan(ty)
    {
        return Ok(InjectedParam {
            ident: ident.clone(),
            ty: ty.clone(),
            plan,
            target: ty.clone(),
            optional: false,
        });
    }

    let (arc, optional) = match unwrap_generic(ty, "Option") {
        Some(inner) => (inner, true),
        None => (ty, false),
    };
    let Some(target) = unwrap_generic(arc, "Arc") else {
        return Err(vec![Diagnostic::new(
            DiagnosticCode::UnsupportedServiceType,
            ty.span(),
            format!("injected service `{ident}` must be `Arc<T>` or `Option<Arc<T>>`"),
        )]);
    };
    let plan = match &args.key {
        Some(key) => ResolutionPlan::KeyedService {
            key: key.value().into(),
        },
        None => ResolutionPlan::DefaultService,
    };
    Ok(InjectedParam {
        ident: ident.clone(),
        ty: ty.clone(),
        plan,
        target: target.clone(),
        optional,
    })
}

fn analyze_method(method: &ImplItemFn) -> Result<DelegatedOperation, Vec<Diagnostic>> {
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

    let mut params = Vec::new();
    for input in &sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let ident = match pat_type.pat.as_ref() {
            Pat::Ident(pat) if pat.subpat.is_none() && pat.by_ref.is_none() => pat.ident.clone(),
            other => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::InvalidPattern,
                    other.span(),
                    "operation parameters must be plain identifiers",
                ));
                continue;
            }
        };
        match inject_attribute(pat_type) {
            Some(attr) => match plan_injection(&ident, &pat_type.ty, attr) {
                Ok(param) => params.push(ImplParam::Injected(param)),
                Err(mut found) => diagnostics.append(&mut found),
            },
            None => params.push(ImplParam::Contract {
                ident,
                ty: (*pat_type.ty).clone(),
            }),
        }
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let operation = DelegatedOperation {
        ident: sig.ident.clone(),
        is_async: sig.asyncness.is_some(),
        wrapper_sig: wrapper_signature(sig, &params),
        attrs: method
            .attrs
            .iter()
            .filter(|a| FORWARDED_ATTRIBUTES.iter().any(|name| a.path().is_ident(name)))
            .cloned()
            .collect(),
        params,
    };

    if operation.is_fallible() && !returns_result(&sig.output) {
        let span = match &sig.output {
            syn::ReturnType::Default => sig.ident.span(),
            syn::ReturnType::Type(_, ty) => ty.span(),
        };
        return Err(vec![Diagnostic::new(
            DiagnosticCode::InfallibleReturn,
            span,
            format!(
                "operation `{}` injects bindings that can fail; it must return `Result<_, E>` with `E: From<opbind::Error>`",
                sig.ident
            ),
        )]);
    }

    Ok(operation)
}

/// The contract-visible signature: injected parameters removed, markers stripped
fn wrapper_signature(sig: &Signature, params: &[ImplParam]) -> Signature {
    let mut wrapper = sig.clone();
    let receiver = sig.inputs.iter().filter(|i| matches!(i, FnArg::Receiver(_)));
    let contract_inputs = params.iter().filter_map(|p| match p {
        ImplParam::Contract { ident, ty } => Some::<FnArg>(parse_quote!(#ident: #ty)),
        ImplParam::Injected(_) => None,
    });
    wrapper.inputs = receiver.cloned().chain(contract_inputs).collect();
    wrapper
}

/// Analyse the `#[operation]` methods of a service implementation
pub fn analyze_impl(item: &ItemImpl) -> ImplAnalysis {
    let mut analysis = ImplAnalysis::default();

    if let Some((_, path, _)) = &item.trait_ {
        analysis.diagnostics.push(Diagnostic::new(
            DiagnosticCode::InvalidAttribute,
            path.span(),
            "service_impl expects an inherent impl block; the contract impl is generated",
        ));
        return analysis;
    }

    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        if !method
            .attrs
            .iter()
            .any(|a| a.path().is_ident(OPERATION_ATTRIBUTE))
        {
            continue;
        }
        match analyze_method(method) {
            Ok(op) => analysis.operations.push(op),
            Err(mut found) => analysis.diagnostics.append(&mut found),
        }
    }
    analysis
}

/// The implementation block with opbind markers removed
fn strip_markers(item: &ItemImpl) -> ItemImpl {
    let mut item = item.clone();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            method
                .attrs
                .retain(|a| !a.path().is_ident(OPERATION_ATTRIBUTE));
            for input in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = input {
                    pat_type.attrs.retain(|a| {
                        !a.path().is_ident(INJECT_ATTRIBUTE) && !a.path().is_ident(OUT_ATTRIBUTE)
                    });
                }
            }
        }
    }
    item
}

/// Expression resolving one injected parameter from `__opbind_scope`
///
/// In the infallible form the scope is an `Option` and only message
/// properties are resolved.
fn resolution_expr(param: &InjectedParam, fallible: bool) -> TokenStream {
    let target = &param.target;
    match &param.plan {
        ResolutionPlan::TransportContext => quote!(__opbind_scope.transport_context()?),
        ResolutionPlan::TransportRequest => quote!(__opbind_scope.transport_request()?),
        ResolutionPlan::TransportResponse => quote!(__opbind_scope.transport_response()?),
        ResolutionPlan::MessageProperty { name, .. } => {
            let name = name.as_ref();
            let lookup = if fallible {
                quote!(__opbind_scope.message_property::<#target>(#name))
            } else {
                quote! {
                    __opbind_scope
                        .as_ref()
                        .and_then(|scope| scope.message_property::<#target>(#name))
                }
            };
            if param.optional {
                lookup
            } else {
                quote!(#lookup.unwrap_or_default())
            }
        }
        ResolutionPlan::KeyedService { key } => {
            let key = key.as_ref();
            if param.optional {
                quote!(__opbind_scope.try_resolve_keyed::<#target>(#key)?)
            } else {
                quote!(__opbind_scope.resolve_keyed::<#target>(#key)?)
            }
        }
        ResolutionPlan::DefaultService => {
            if param.optional {
                quote!(__opbind_scope.try_resolve::<#target>()?)
            } else {
                quote!(__opbind_scope.resolve::<#target>()?)
            }
        }
    }
}

fn emit_wrapper(op: &DelegatedOperation) -> TokenStream {
    let ident = &op.ident;
    let sig = &op.wrapper_sig;
    let attrs = &op.attrs;
    let args = op.params.iter().map(ImplParam::ident);
    let await_call = op.is_async.then(|| quote!(.await));
    let call = quote!(Self::#ident(self, #(#args),*) #await_call);

    if op.injected().next().is_none() {
        return quote! {
            #(#attrs)*
            #sig {
                #call
            }
        };
    }

    let fallible = op.is_fallible();
    let open_scope = if fallible {
        quote!(let __opbind_scope = ::opbind::InjectionScope::current()?;)
    } else {
        quote!(let __opbind_scope = ::opbind::InjectionScope::current().ok();)
    };
    let resolutions = op.injected().map(|param| {
        let var = &param.ident;
        let ty = &param.ty;
        let expr = resolution_expr(param, fallible);
        quote!(let #var: #ty = #expr;)
    });

    quote! {
        #(#attrs)*
        #sig {
            #open_scope
            #(#resolutions)*
            let __opbind_result = #call;
            ::core::mem::drop(__opbind_scope);
            __opbind_result
        }
    }
}

/// Emit the cleaned implementation block and the generated contract impl
pub fn emit_impl(contract: &Path, item: &ItemImpl, analysis: &ImplAnalysis) -> TokenStream {
    let inherent = strip_markers(item);
    let diagnostics = diagnostic::render(&analysis.diagnostics);
    if item.trait_.is_some() {
        return quote! { #inherent #diagnostics };
    }

    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let self_ty = &item.self_ty;
    let async_attr = analysis
        .operations
        .iter()
        .any(|op| op.is_async)
        .then(|| quote!(#[::opbind::async_trait]));
    let wrappers = analysis.operations.iter().map(emit_wrapper);

    quote! {
        #inherent

        #async_attr
        impl #impl_generics #contract for #self_ty #where_clause {
            #(#wrappers)*
        }

        #diagnostics
    }
}
