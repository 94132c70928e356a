//! Unit tests for contract analysis

use opbind_codegen::{ContractAttr, DiagnosticCode, analyze_contract};
use opbind_domain::{ParameterDirection, ReturnShape};
use quote::quote;
use syn::{ItemTrait, parse_quote};

fn calculator() -> ItemTrait {
    parse_quote! {
        pub trait Calculator {
            fn add(&self, a: i32, b: i32) -> i32;
            fn divide(&self, a: i32, b: i32, #[out] remainder: &mut i32) -> Result<i32, MathError>;
            fn accumulate(&self, value: i64, total: &mut i64);
            async fn reset(&self);
            async fn snapshot(&self, label: String) -> std::vec::Vec<u8>;
        }
    }
}

#[test]
fn test_operations_in_declaration_order() {
    let analysis = analyze_contract(&calculator(), Some("calc"));
    assert!(analysis.diagnostics.is_empty());
    let names: Vec<String> = analysis
        .spec
        .operations
        .iter()
        .map(|op| op.ident.to_string())
        .collect();
    assert_eq!(names, ["add", "divide", "accumulate", "reset", "snapshot"]);
    assert_eq!(analysis.spec.declaring_type, "calc::Calculator");
    assert!(analysis.spec.has_async);
}

#[test]
fn test_directions() {
    let analysis = analyze_contract(&calculator(), Some("calc"));
    let divide = &analysis.spec.operations[1];
    let directions: Vec<ParameterDirection> = divide.params.iter().map(|p| p.direction).collect();
    assert_eq!(
        directions,
        [
            ParameterDirection::In,
            ParameterDirection::In,
            ParameterDirection::Out
        ]
    );
    let accumulate = &analysis.spec.operations[2];
    assert_eq!(accumulate.params[1].direction, ParameterDirection::InOut);
    assert_eq!(accumulate.signature.parameters[1].type_name, "i64");
}

#[test]
fn test_return_shapes() {
    let analysis = analyze_contract(&calculator(), Some("calc"));
    let shapes: Vec<ReturnShape> = analysis.spec.operations.iter().map(|op| op.shape()).collect();
    assert_eq!(
        shapes,
        [
            ReturnShape::Value,
            ReturnShape::Value,
            ReturnShape::Void,
            ReturnShape::AsyncVoid,
            ReturnShape::AsyncValue
        ]
    );
    assert!(analysis.spec.operations[1].ret.fallible);
}

#[test]
fn test_keys_are_canonical() {
    let analysis = analyze_contract(&calculator(), Some("calc"));
    let keys: Vec<&str> = analysis.spec.operations.iter().map(|op| op.key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "calc.Calculator.add(i32, i32)",
            "calc.Calculator.divide(i32, i32, out i32)",
            "calc.Calculator.accumulate(i64, inout i64)",
            "calc.Calculator.reset()",
            "calc.Calculator.snapshot(String)",
        ]
    );
}

#[test]
fn test_invalid_operations_are_skipped_individually() {
    let item: ItemTrait = parse_quote! {
        trait Broken {
            fn ok(&self, a: u8);
            fn owned(self);
            fn shared(&self, a: &str);
            fn generic<T>(&self, a: T);
            fn bad_out(&self, #[out] a: u8);
        }
    };
    let analysis = analyze_contract(&item, Some("ns"));
    assert_eq!(analysis.spec.operations.len(), 1);
    let codes: Vec<DiagnosticCode> = analysis.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        [
            DiagnosticCode::InvalidReceiver,
            DiagnosticCode::SharedReference,
            DiagnosticCode::GenericOperation,
            DiagnosticCode::InvalidOut
        ]
    );
}

#[test]
fn test_generic_contract_is_rejected() {
    let item: ItemTrait = parse_quote! {
        trait Store<T> {
            fn put(&self, value: T);
        }
    };
    let analysis = analyze_contract(&item, Some("ns"));
    assert!(!analysis.spec.supported);
    assert!(analysis.spec.operations.is_empty());
    assert_eq!(analysis.diagnostics.len(), 1);
}

#[test]
fn test_contract_attr_namespace() {
    let attr = ContractAttr::parse(quote!(namespace = "billing")).expect("parse");
    assert_eq!(attr.namespace.as_deref(), Some("billing"));
    assert!(ContractAttr::parse(quote!()).expect("empty").namespace.is_none());
    assert!(ContractAttr::parse(quote!(flavour = "x")).is_err());
}

#[test]
fn test_keys_do_not_depend_on_declaration_order() {
    let reordered: ItemTrait = parse_quote! {
        pub trait Calculator {
            async fn snapshot(&self, label: String) -> std::vec::Vec<u8>;
            fn accumulate(&self, value: i64, total: &mut i64);
            fn divide(&self, a: i32, b: i32, #[out] remainder: &mut i32) -> Result<i32, MathError>;
            async fn reset(&self);
            fn add(&self, a: i32, b: i32) -> i32;
        }
    };
    let keys = |item: &ItemTrait| {
        let mut keys: Vec<String> = analyze_contract(item, Some("calc"))
            .spec
            .operations
            .iter()
            .map(|op| op.key.to_string())
            .collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&calculator()), keys(&reordered));
}

#[test]
fn test_contract_without_namespace_is_module_relative() {
    let analysis = analyze_contract(&calculator(), None);
    assert!(analysis.spec.namespace.is_none());
    assert_eq!(analysis.spec.declaring_type, "self::Calculator");
    assert_eq!(
        analysis.spec.operations[0].key.as_str(),
        "self.Calculator.add(i32, i32)"
    );
}
