//! Generated invocation adapters: return shapes, directions and arity

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use opbind::{
    Error, InputBuffer, ParameterDirection, ReturnShape, ServiceContract, ServiceInstance, Value,
};

use crate::support::{adapter_for, signature_of};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("division by zero")]
    DivideByZero,
}

#[opbind::service_contract(namespace = "shapes")]
pub trait Shapes {
    fn touch(&self);
    fn double(&self, value: i32) -> i32;
    async fn reset(&self);
    async fn describe(&self, label: String) -> String;
    fn mix(&self, a: i32, #[out] b: &mut i32, c: &mut i32, d: i32);
    fn divide(&self, a: i32, b: i32, #[out] remainder: &mut i32) -> Result<i32, MathError>;
    fn clear(&self) -> Result<(), MathError>;
}

#[derive(Default)]
pub struct ShapesService {
    touched: AtomicUsize,
    resets: AtomicUsize,
}

#[opbind::async_trait]
impl Shapes for ShapesService {
    fn touch(&self) {
        self.touched.fetch_add(1, Ordering::SeqCst);
    }

    fn double(&self, value: i32) -> i32 {
        value * 2
    }

    async fn reset(&self) {
        tokio::task::yield_now().await;
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    async fn describe(&self, label: String) -> String {
        tokio::task::yield_now().await;
        format!("<{label}>")
    }

    fn mix(&self, a: i32, b: &mut i32, c: &mut i32, d: i32) {
        *b = a + d;
        *c += 1;
    }

    fn divide(&self, a: i32, b: i32, remainder: &mut i32) -> Result<i32, MathError> {
        if b == 0 {
            return Err(MathError::DivideByZero);
        }
        *remainder = a % b;
        Ok(a / b)
    }

    fn clear(&self) -> Result<(), MathError> {
        Ok(())
    }
}

fn instance() -> (Arc<ShapesService>, ServiceInstance) {
    let service = Arc::new(ShapesService::default());
    let contract: Arc<dyn Shapes> = service.clone();
    (service, ServiceInstance::new(contract))
}

fn inputs(method: &str, values: Vec<Value>) -> InputBuffer {
    let mut buffer = adapter_for::<dyn Shapes>(method).allocate_inputs();
    buffer.fill(values).unwrap();
    buffer
}

#[test]
fn test_contract_metadata() {
    assert_eq!(<dyn Shapes as ServiceContract>::NAME, "shapes::Shapes");
    let methods: Vec<&str> = <dyn Shapes>::operations()
        .iter()
        .map(|op| &*op.method)
        .collect();
    assert_eq!(
        methods,
        ["touch", "double", "reset", "describe", "mix", "divide", "clear"]
    );
}

#[test]
fn test_signature_shapes() {
    let shape = |m: &str| signature_of::<dyn Shapes>(m).return_shape;
    assert_eq!(shape("touch"), ReturnShape::Void);
    assert_eq!(shape("double"), ReturnShape::Value);
    assert_eq!(shape("reset"), ReturnShape::AsyncVoid);
    assert_eq!(shape("describe"), ReturnShape::AsyncValue);
    assert_eq!(shape("clear"), ReturnShape::Void);
}

#[tokio::test]
async fn test_sync_void() {
    let (service, instance) = instance();
    let adapter = adapter_for::<dyn Shapes>("touch");
    let outcome = adapter
        .invoke(&instance, adapter.allocate_inputs())
        .await
        .unwrap();
    assert!(outcome.return_value.is_none());
    assert!(outcome.outputs.is_empty());
    assert_eq!(service.touched.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sync_value() {
    let (_, instance) = instance();
    let outcome = adapter_for::<dyn Shapes>("double")
        .invoke(&instance, inputs("double", vec![Box::new(21_i32) as Value]))
        .await
        .unwrap();
    assert_eq!(outcome.return_as::<i32>(), Some(&42));
}

#[tokio::test]
async fn test_async_void() {
    let (service, instance) = instance();
    let adapter = adapter_for::<dyn Shapes>("reset");
    let outcome = adapter
        .invoke(&instance, adapter.allocate_inputs())
        .await
        .unwrap();
    assert!(outcome.return_value.is_none());
    assert_eq!(service.resets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_value() {
    let (_, instance) = instance();
    let outcome = adapter_for::<dyn Shapes>("describe")
        .invoke(
            &instance,
            inputs("describe", vec![Box::new("box".to_string()) as Value]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.into_return::<String>().as_deref(), Some("<box>"));
}

#[tokio::test]
async fn test_mixed_directions_arity() {
    let signature = signature_of::<dyn Shapes>("mix");
    let directions: Vec<ParameterDirection> =
        signature.parameters.iter().map(|p| p.direction).collect();
    assert_eq!(
        directions,
        [
            ParameterDirection::In,
            ParameterDirection::Out,
            ParameterDirection::InOut,
            ParameterDirection::In
        ]
    );

    let adapter = adapter_for::<dyn Shapes>("mix");
    assert_eq!(adapter.allocate_inputs().len(), 3);

    let (_, instance) = instance();
    let outcome = adapter
        .invoke(
            &instance,
            inputs(
                "mix",
                vec![
                    Box::new(1_i32) as Value,
                    Box::new(10_i32),
                    Box::new(100_i32),
                ],
            ),
        )
        .await
        .unwrap();
    assert!(outcome.return_value.is_none());
    assert_eq!(outcome.outputs.len(), 2);
    assert_eq!(outcome.output_as::<i32>(0), Some(&101));
    assert_eq!(outcome.output_as::<i32>(1), Some(&11));
}

#[tokio::test]
async fn test_fallible_success_and_out_parameter() {
    let (_, instance) = instance();
    let outcome = adapter_for::<dyn Shapes>("divide")
        .invoke(
            &instance,
            inputs("divide", vec![Box::new(7_i32) as Value, Box::new(2_i32)]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.return_as::<i32>(), Some(&3));
    assert_eq!(outcome.output_as::<i32>(0), Some(&1));
}

#[tokio::test]
async fn test_operation_errors_surface_unchanged() {
    let (_, instance) = instance();
    let err = adapter_for::<dyn Shapes>("divide")
        .invoke(
            &instance,
            inputs("divide", vec![Box::new(7_i32) as Value, Box::new(0_i32)]),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_operation::<MathError>(),
        Some(&MathError::DivideByZero)
    );
    assert!(!err.is_startup_integrity());
}

#[tokio::test]
async fn test_fallible_void_returns_nothing() {
    let (_, instance) = instance();
    let adapter = adapter_for::<dyn Shapes>("clear");
    let outcome = adapter
        .invoke(&instance, adapter.allocate_inputs())
        .await
        .unwrap();
    assert!(outcome.return_value.is_none());
}

#[tokio::test]
async fn test_wrong_input_type() {
    let (_, instance) = instance();
    let err = adapter_for::<dyn Shapes>("double")
        .invoke(&instance, inputs("double", vec![Box::new("21") as Value]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InputTypeMismatch { position: 0, .. }));
}

#[tokio::test]
async fn test_instance_of_another_contract_is_rejected() {
    let other: Arc<String> = Arc::new("not a service".to_string());
    let err = adapter_for::<dyn Shapes>("touch")
        .invoke(&ServiceInstance::new(other), InputBuffer::empty())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InstanceTypeMismatch { .. }));
}

mod private {
    use std::sync::Arc;

    use opbind::{InputBuffer, ServiceInstance};

    use crate::support::adapter_for;

    #[opbind::service_contract(namespace = "shapes")]
    trait Secret {
        fn whisper(&self) -> String;
    }

    struct SecretService;

    impl Secret for SecretService {
        fn whisper(&self) -> String {
            "psst".to_string()
        }
    }

    #[tokio::test]
    async fn test_private_contract_generates_adapters() {
        let service: Arc<dyn Secret> = Arc::new(SecretService);
        let outcome = adapter_for::<dyn Secret>("whisper")
            .invoke(&ServiceInstance::new(service), InputBuffer::empty())
            .await
            .unwrap();
        assert_eq!(outcome.return_as::<String>().map(String::as_str), Some("psst"));
    }
}
