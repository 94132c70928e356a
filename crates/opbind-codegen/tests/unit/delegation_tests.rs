//! Unit tests for delegation analysis and wrapper emission

use opbind_codegen::delegation::emit_impl;
use opbind_codegen::{DiagnosticCode, analyze_impl};
use opbind_domain::ResolutionPlan;
use syn::{File, ItemImpl, Path, parse_quote};

fn contract() -> Path {
    parse_quote!(Greeter)
}

#[test]
fn test_plans_follow_declared_metadata() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(
                &self,
                name: String,
                #[inject] request: TransportRequest,
                #[inject(property = "tenant")] tenant: Option<String>,
                #[inject(key = "utc")] clock: Arc<dyn Clock>,
                #[inject] audit: Option<Arc<dyn Audit>>,
            ) -> Result<String, Error> {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert!(analysis.diagnostics.is_empty());
    let op = &analysis.operations[0];
    assert_eq!(
        op.plans(),
        vec![
            ResolutionPlan::TransportRequest,
            ResolutionPlan::MessageProperty {
                name: "tenant".into(),
                type_name: "String".into()
            },
            ResolutionPlan::KeyedService { key: "utc".into() },
            ResolutionPlan::DefaultService,
        ]
    );
    assert!(op.is_fallible());
    // Wrapper keeps only the receiver and the contract parameter
    assert_eq!(op.wrapper_sig.inputs.len(), 2);
}

#[test]
fn test_conflicting_metadata_yields_one_diagnostic_and_no_wrapper() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(
                &self,
                #[inject(property = "tenant", key = "primary")] tenant: Option<String>,
            ) -> String {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::ConflictingBinding);
    assert!(analysis.operations.is_empty());
}

#[test]
fn test_conflict_wins_over_empty_property_name() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(&self, #[inject(property = "", key = "k")] t: Option<String>) -> String {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::ConflictingBinding);
}

#[test]
fn test_empty_property_name() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(&self, #[inject(property = "  ")] t: Option<String>) -> String {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::EmptyPropertyName);
}

#[test]
fn test_unknown_inject_argument() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(&self, #[inject(scope = "call")] c: Arc<dyn Clock>) -> Result<(), Error> {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::UnknownInjectArgument);
    assert!(analysis.operations.is_empty());
}

#[test]
fn test_fallible_binding_requires_result_return() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(&self, #[inject] clock: Arc<dyn Clock>) -> String {
                todo!()
            }

            #[operation]
            fn tag(&self, #[inject(property = "tag")] tag: String) -> String {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::InfallibleReturn);
    // Message properties are best-effort, so `tag` still generates
    assert_eq!(analysis.operations.len(), 1);
    assert!(!analysis.operations[0].is_fallible());
}

#[test]
fn test_service_binding_type_is_checked() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn greet(&self, #[inject] clock: Box<dyn Clock>) -> Result<(), Error> {
                todo!()
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::UnsupportedServiceType);
}

#[test]
fn test_methods_without_operation_marker_are_ignored() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            fn helper(&self) {}

            #[operation]
            fn greet(&self, name: String) -> String {
                name
            }
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.operations.len(), 1);
    assert_eq!(analysis.operations[0].injected().count(), 0);
}

#[test]
fn test_emitted_impl_parses_and_strips_markers() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            async fn greet(
                &self,
                mut name: String,
                #[inject] clock: Arc<dyn Clock>,
            ) -> Result<String, Error> {
                name.push('!');
                Ok(name)
            }
        }
    };
    let analysis = analyze_impl(&item);
    let tokens = emit_impl(&contract(), &item, &analysis);
    let file: File = syn::parse2(tokens.clone()).expect("expansion parses as items");
    assert_eq!(file.items.len(), 2);

    let text = tokens.to_string();
    assert!(!text.contains("# [operation]"));
    assert!(!text.contains("# [inject]"));
    assert!(text.contains("impl Greeter for GreeterService"));
    assert!(text.contains("InjectionScope :: current () ?"));
    assert!(text.contains("Self :: greet (self , name , clock) . await"));
    assert!(text.contains("async_trait"));
}

#[test]
fn test_property_only_wrapper_does_not_fail() {
    let item: ItemImpl = parse_quote! {
        impl GreeterService {
            #[operation]
            fn tag(&self, #[inject(property = "tag")] tag: String) -> String {
                tag
            }
        }
    };
    let analysis = analyze_impl(&item);
    let text = emit_impl(&contract(), &item, &analysis).to_string();
    assert!(text.contains("InjectionScope :: current () . ok ()"));
    assert!(text.contains("unwrap_or_default"));
}

#[test]
fn test_trait_impl_is_rejected() {
    let item: ItemImpl = parse_quote! {
        impl Greeter for GreeterService {
            fn greet(&self) {}
        }
    };
    let analysis = analyze_impl(&item);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.operations.is_empty());
}
