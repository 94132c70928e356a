//! Procedural macros for opbind
//!
//! Thin front end over `opbind-codegen`. Use through the `opbind` facade;
//! generated code refers to `::opbind::...` paths.

use proc_macro::TokenStream;

/// Declare a service contract
///
/// ```ignore
/// #[opbind::service_contract(namespace = "calc")]
/// pub trait Calculator {
///     fn add(&self, a: i32, b: i32) -> i32;
///     fn divide(&self, a: i32, b: i32, #[out] remainder: &mut i32) -> Result<i32, MathError>;
///     async fn reset(&self);
/// }
/// ```
///
/// Emits the trait, its operation signatures, one invocation adapter per
/// operation and the registry entries that link them. Without `namespace`
/// the contract is declared by its module path.
#[proc_macro_attribute]
pub fn service_contract(attr: TokenStream, item: TokenStream) -> TokenStream {
    opbind_codegen::expand_service_contract(attr.into(), item.into()).into()
}

/// Implement a contract from an inherent impl block with injected parameters
///
/// Methods marked `#[operation]` implement the contract method of the same
/// name. Parameters marked `#[inject]`, `#[inject(key = "...")]` or
/// `#[inject(property = "...")]` are resolved per call.
#[proc_macro_attribute]
pub fn service_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    opbind_codegen::expand_service_impl(attr.into(), item.into()).into()
}
