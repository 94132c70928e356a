//! Code Generation - opbind
//!
//! Build-time half of dispatch adaptation. Everything here runs inside the
//! `opbind-macros` procedural macros, but is an ordinary library over
//! `syn`/`quote` so it can be tested directly.
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`contract`] | Analyse a contract trait into operation specs |
//! | [`adapter`] | Emit signature statics, invocation adapters and registry entries |
//! | [`delegation`] | Analyse `#[operation]` methods and emit delegation wrappers |
//! | [`diagnostic`] | Generation diagnostics rendered as `compile_error!` |
//! | [`types`] | Type inspection helpers |
//!
//! Canonical keys are computed with `opbind_domain::canonicalize`, the
//! same function the runtime uses.

pub mod adapter;
pub mod contract;
pub mod delegation;
pub mod diagnostic;
pub mod types;

use proc_macro2::TokenStream;
use syn::{ItemImpl, ItemTrait, Path};

pub use contract::{ContractAnalysis, ContractAttr, analyze_contract};
pub use delegation::{ImplAnalysis, analyze_impl};
pub use diagnostic::{Diagnostic, DiagnosticCode};

/// Expand `#[service_contract(...)]`
pub fn expand_service_contract(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = match ContractAttr::parse(attr) {
        Ok(attr) => attr,
        Err(e) => return e.to_compile_error(),
    };
    let item: ItemTrait = match syn::parse2(item) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error(),
    };
    let analysis = analyze_contract(&item, attr.namespace.as_deref());
    adapter::emit_contract(&item, &analysis)
}

/// Expand `#[service_impl(Contract)]`
pub fn expand_service_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let contract: Path = match syn::parse2(attr) {
        Ok(path) => path,
        Err(e) => return e.to_compile_error(),
    };
    let item: ItemImpl = match syn::parse2(item) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error(),
    };
    let analysis = analyze_impl(&item);
    delegation::emit_impl(&contract, &item, &analysis)
}
