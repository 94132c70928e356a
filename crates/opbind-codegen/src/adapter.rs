//! Invocation adapter synthesis
//!
//! For each analysed contract operation this emits a signature static, an
//! adapter type implementing `InvocationAdapter` and a linked registry
//! entry. The adapter body is straight-line code specialised to the
//! operation: inputs are taken from their slots, `Out` parameters start
//! from `Default`, the method is called (and awaited for async shapes),
//! and outputs are boxed in declared order.

use opbind_domain::{ParameterDirection, ReturnShape};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{FnArg, ItemTrait, TraitItem, TypeParamBound, parse_quote};

use crate::contract::{ContractAnalysis, ContractSpec, OUT_ATTRIBUTE, OperationSpec};
use crate::diagnostic;

/// Emit the contract trait and everything generated for it
pub fn emit_contract(item: &ItemTrait, analysis: &ContractAnalysis) -> TokenStream {
    let spec = &analysis.spec;
    let trait_item = prepare_trait(item, spec.has_async);
    let diagnostics = diagnostic::render(&analysis.diagnostics);
    if !spec.supported {
        return quote! { #trait_item #diagnostics };
    }

    let contract_impl = emit_contract_impl(spec);
    let operations = spec.operations.iter().map(|op| emit_operation(spec, op));

    quote! {
        #trait_item
        #contract_impl
        #(#operations)*
        #diagnostics
    }
}

fn is_async_trait_attr(attr: &syn::Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|s| s.ident == "async_trait")
}

/// The trait as re-emitted: `#[out]` markers removed, `Send + Sync`
/// supertraits added, `async_trait` applied when any method is async
pub fn prepare_trait(item: &ItemTrait, has_async: bool) -> ItemTrait {
    let mut item = item.clone();
    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            for input in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = input {
                    pat_type.attrs.retain(|a| !a.path().is_ident(OUT_ATTRIBUTE));
                }
            }
        }
    }
    ensure_supertrait(&mut item, "Send");
    ensure_supertrait(&mut item, "Sync");
    if has_async && !item.attrs.iter().any(is_async_trait_attr) {
        item.attrs.push(parse_quote!(#[::opbind::async_trait]));
    }
    item
}

fn ensure_supertrait(item: &mut ItemTrait, name: &str) {
    let present = item.supertraits.iter().any(|bound| {
        matches!(bound, TypeParamBound::Trait(t)
            if t.path.segments.last().is_some_and(|s| s.ident == name))
    });
    if !present {
        let ident = format_ident!("{}", name);
        item.supertraits.push(parse_quote!(::core::marker::#ident));
        item.colon_token.get_or_insert_with(Default::default);
    }
}

fn upper(ident: &Ident) -> String {
    ident.unraw().to_string().to_uppercase()
}

fn operation_static(spec: &ContractSpec, op: &OperationSpec, kind: &str) -> Ident {
    format_ident!("__OPBIND_{}__{}__{}", kind, upper(&spec.ident), upper(&op.ident))
}

fn direction_tokens(direction: ParameterDirection) -> TokenStream {
    match direction {
        ParameterDirection::In => quote!(::opbind::ParameterDirection::In),
        ParameterDirection::Out => quote!(::opbind::ParameterDirection::Out),
        ParameterDirection::InOut => quote!(::opbind::ParameterDirection::InOut),
    }
}

fn shape_tokens(shape: ReturnShape) -> TokenStream {
    match shape {
        ReturnShape::Void => quote!(::opbind::ReturnShape::Void),
        ReturnShape::Value => quote!(::opbind::ReturnShape::Value),
        ReturnShape::AsyncVoid => quote!(::opbind::ReturnShape::AsyncVoid),
        ReturnShape::AsyncValue => quote!(::opbind::ReturnShape::AsyncValue),
    }
}

/// Declaring type expression: the literal name, or one built from `module_path!()`
fn declaring_tokens(spec: &ContractSpec) -> TokenStream {
    match &spec.namespace {
        Some(_) => {
            let declaring = &spec.declaring_type;
            quote!(#declaring)
        }
        None => {
            let trait_name = spec.ident.unraw().to_string();
            quote!(::core::concat!(::core::module_path!(), "::", #trait_name))
        }
    }
}

fn emit_contract_impl(spec: &ContractSpec) -> TokenStream {
    let trait_ident = &spec.ident;
    let declaring = declaring_tokens(spec);
    let ops_ident = format_ident!("__OPBIND_OPERATIONS__{}", upper(&spec.ident));
    let count = spec.operations.len();
    let signatures = spec
        .operations
        .iter()
        .map(|op| operation_static(spec, op, "SIG"));

    quote! {
        #[doc(hidden)]
        static #ops_ident: [&::opbind::OperationSignature; #count] = [#(&#signatures),*];

        impl ::opbind::ServiceContract for dyn #trait_ident {
            const NAME: &'static str = #declaring;

            fn operations() -> &'static [&'static ::opbind::OperationSignature] {
                &#ops_ident
            }
        }
    }
}

fn emit_signature(spec: &ContractSpec, op: &OperationSpec) -> TokenStream {
    let params_ident = operation_static(spec, op, "PARAMS");
    let sig_ident = operation_static(spec, op, "SIG");
    let declaring = declaring_tokens(spec);
    let method = &*op.signature.method;
    let count = op.signature.parameters.len();
    let shape = shape_tokens(op.shape());
    let descriptors = op.signature.parameters.iter().map(|p| {
        let name = &*p.name;
        let type_name = &*p.type_name;
        let direction = direction_tokens(p.direction);
        let position = p.position;
        quote! {
            ::opbind::ParameterDescriptor::new_static(#name, #type_name, #direction, #position)
        }
    });

    quote! {
        #[doc(hidden)]
        static #params_ident: [::opbind::ParameterDescriptor; #count] = [#(#descriptors),*];

        #[doc(hidden)]
        static #sig_ident: ::opbind::OperationSignature =
            ::opbind::OperationSignature::new_static(#declaring, #method, &#params_ident, #shape);
    }
}

/// Body of `invoke`: bind parameters, call, collect outputs
fn emit_invoke_body(op: &OperationSpec) -> TokenStream {
    let method = &op.ident;
    let mut slot = 0_usize;
    let mut bindings = Vec::new();
    let mut call_args = Vec::new();
    let mut outputs = Vec::new();

    for (i, param) in op.params.iter().enumerate() {
        let var = format_ident!("__opbind_arg{}", i);
        let ty = &param.ty;
        match param.direction {
            ParameterDirection::In => {
                bindings.push(quote!(let #var: #ty = inputs.take::<#ty>(#slot)?;));
                call_args.push(quote!(#var));
                slot += 1;
            }
            ParameterDirection::InOut => {
                bindings.push(quote!(let mut #var: #ty = inputs.take::<#ty>(#slot)?;));
                call_args.push(quote!(&mut #var));
                outputs.push(quote!(::std::boxed::Box::new(#var) as ::opbind::Value));
                slot += 1;
            }
            ParameterDirection::Out => {
                bindings.push(quote! {
                    let mut #var: #ty = <#ty as ::core::default::Default>::default();
                });
                call_args.push(quote!(&mut #var));
                outputs.push(quote!(::std::boxed::Box::new(#var) as ::opbind::Value));
            }
        }
    }

    let await_call = op.is_async.then(|| quote!(.await));
    let call = quote!(__opbind_service.#method(#(#call_args),*) #await_call);
    let surface = op
        .ret
        .fallible
        .then(|| quote!(.map_err(::opbind::Error::operation)?));

    let (call_stmt, return_value) = if op.ret.has_value() {
        (
            quote!(let __opbind_return = #call #surface;),
            quote!(::core::option::Option::Some(
                ::std::boxed::Box::new(__opbind_return) as ::opbind::Value
            )),
        )
    } else {
        (quote!(#call #surface;), quote!(::core::option::Option::None))
    };

    let outputs = if outputs.is_empty() {
        quote!(::std::vec::Vec::new())
    } else {
        quote!(::std::vec![#(#outputs),*])
    };

    quote! {
        #(#bindings)*
        #call_stmt
        ::core::result::Result::Ok(::opbind::InvocationOutcome::new(#return_value, #outputs))
    }
}

fn emit_operation(spec: &ContractSpec, op: &OperationSpec) -> TokenStream {
    let trait_ident = &spec.ident;
    let sig_ident = operation_static(spec, op, "SIG");
    let entry_ident = operation_static(spec, op, "ENTRY");
    let adapter_ident = format_ident!(
        "__OpbindAdapter_{}_{}",
        spec.ident.unraw(),
        op.ident.unraw()
    );
    let factory_ident = format_ident!(
        "__opbind_factory_{}_{}",
        spec.ident.unraw(),
        op.ident.unraw()
    );
    let signature = emit_signature(spec, op);
    let body = emit_invoke_body(op);

    let input_count = op.signature.input_count();
    let (allocate, inputs_pat) = if input_count == 0 {
        (quote!(::opbind::InputBuffer::empty()), quote!(_inputs))
    } else {
        (
            quote!(::opbind::InputBuffer::with_len(#input_count)),
            quote!(mut inputs),
        )
    };

    quote! {
        #signature

        #[doc(hidden)]
        #[allow(non_camel_case_types)]
        struct #adapter_ident;

        #[::opbind::async_trait]
        impl ::opbind::InvocationAdapter for #adapter_ident {
            fn signature(&self) -> &'static ::opbind::OperationSignature {
                &#sig_ident
            }

            fn allocate_inputs(&self) -> ::opbind::InputBuffer {
                #allocate
            }

            async fn invoke(
                &self,
                instance: &::opbind::ServiceInstance,
                #inputs_pat: ::opbind::InputBuffer,
            ) -> ::opbind::Result<::opbind::InvocationOutcome> {
                let __opbind_service = instance.contract::<dyn #trait_ident>()?;
                #body
            }
        }

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #factory_ident() -> ::std::sync::Arc<dyn ::opbind::InvocationAdapter> {
            ::std::sync::Arc::new(#adapter_ident)
        }

        #[::opbind::linkme::distributed_slice(::opbind::INVOCATION_ADAPTERS)]
        #[linkme(crate = ::opbind::linkme)]
        #[doc(hidden)]
        static #entry_ident: ::opbind::InvocationAdapterEntry = ::opbind::InvocationAdapterEntry {
            signature: &#sig_ident,
            factory: #factory_ident,
        };
    }
}
