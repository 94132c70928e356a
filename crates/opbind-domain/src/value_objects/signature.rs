//! Operation Signature Value Objects
//!
//! The immutable description of one contract operation: who declares it,
//! what it is called, its parameters with their directions and the shape
//! of its return. Generated code builds these as statics; analysis code
//! builds them from parsed syntax. Both feed the same canonicalizer.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{KEY_INOUT_PREFIX, KEY_OUT_PREFIX};

/// Direction in which a parameter value travels across a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterDirection {
    /// Value supplied by the caller, not written back
    In,
    /// Value produced by the operation only
    Out,
    /// Value supplied by the caller and written back
    InOut,
}

impl ParameterDirection {
    /// Whether the parameter occupies an input slot
    pub const fn flows_in(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Whether the parameter occupies an output slot
    pub const fn flows_out(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }

    /// Prefix written before the type name in a canonical key
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::In => "",
            Self::Out => KEY_OUT_PREFIX,
            Self::InOut => KEY_INOUT_PREFIX,
        }
    }
}

/// Shape of an operation's return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnShape {
    /// Synchronous, no value
    Void,
    /// Synchronous, produces a value
    Value,
    /// Asynchronous, no value once awaited
    AsyncVoid,
    /// Asynchronous, produces a value once awaited
    AsyncValue,
}

impl ReturnShape {
    /// Classify a return from whether it is awaited and whether it carries a value
    pub const fn classify(is_async: bool, has_value: bool) -> Self {
        match (is_async, has_value) {
            (false, false) => Self::Void,
            (false, true) => Self::Value,
            (true, false) => Self::AsyncVoid,
            (true, true) => Self::AsyncValue,
        }
    }

    /// Whether the call must be awaited
    pub const fn is_async(self) -> bool {
        matches!(self, Self::AsyncVoid | Self::AsyncValue)
    }

    /// Whether the call yields a return value
    pub const fn has_value(self) -> bool {
        matches!(self, Self::Value | Self::AsyncValue)
    }
}

/// One declared parameter of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    /// Declared parameter name
    pub name: Cow<'static, str>,
    /// Value type as written, without the direction's reference
    pub type_name: Cow<'static, str>,
    /// Direction of travel
    pub direction: ParameterDirection,
    /// Zero-based position in the declared parameter list
    pub position: usize,
}

impl ParameterDescriptor {
    /// Create a descriptor from owned strings
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        type_name: impl Into<Cow<'static, str>>,
        direction: ParameterDirection,
        position: usize,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            direction,
            position,
        }
    }

    /// Create a descriptor usable in a `static`
    pub const fn new_static(
        name: &'static str,
        type_name: &'static str,
        direction: ParameterDirection,
        position: usize,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            type_name: Cow::Borrowed(type_name),
            direction,
            position,
        }
    }
}

/// Value Object: Operation Signature
///
/// Derived once from a declared contract method and never mutated.
///
/// ## Example
///
/// ```rust
/// use opbind_domain::value_objects::{
///     OperationSignature, ParameterDescriptor, ParameterDirection, ReturnShape,
/// };
///
/// static PARAMS: [ParameterDescriptor; 2] = [
///     ParameterDescriptor::new_static("a", "i32", ParameterDirection::In, 0),
///     ParameterDescriptor::new_static("sum", "i32", ParameterDirection::Out, 1),
/// ];
/// static ADD: OperationSignature =
///     OperationSignature::new_static("calc::Calculator", "add", &PARAMS, ReturnShape::Void);
///
/// assert_eq!(ADD.input_count(), 1);
/// assert_eq!(ADD.output_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationSignature {
    /// Fully qualified name of the declaring contract
    pub declaring_type: Cow<'static, str>,
    /// Operation (method) name
    pub method: Cow<'static, str>,
    /// Parameters in declared order
    pub parameters: Cow<'static, [ParameterDescriptor]>,
    /// Return shape
    pub return_shape: ReturnShape,
}

impl OperationSignature {
    /// Create a signature from owned parts
    pub fn new(
        declaring_type: impl Into<Cow<'static, str>>,
        method: impl Into<Cow<'static, str>>,
        parameters: Vec<ParameterDescriptor>,
        return_shape: ReturnShape,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
            parameters: Cow::Owned(parameters),
            return_shape,
        }
    }

    /// Create a signature usable in a `static`
    pub const fn new_static(
        declaring_type: &'static str,
        method: &'static str,
        parameters: &'static [ParameterDescriptor],
        return_shape: ReturnShape,
    ) -> Self {
        Self {
            declaring_type: Cow::Borrowed(declaring_type),
            method: Cow::Borrowed(method),
            parameters: Cow::Borrowed(parameters),
            return_shape,
        }
    }

    /// Number of input slots (`In` and `InOut` parameters)
    pub fn input_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.direction.flows_in())
            .count()
    }

    /// Number of output slots (`Out` and `InOut` parameters)
    pub fn output_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.direction.flows_out())
            .count()
    }

    /// Parameters that occupy input slots, in declared order
    pub fn inputs(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.direction.flows_in())
    }

    /// Parameters that occupy output slots, in declared order
    pub fn outputs(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.direction.flows_out())
    }
}

impl fmt::Display for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.declaring_type, self.method)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}{}: {}", p.direction.keyword(), p.name, p.type_name)?;
        }
        f.write_str(")")
    }
}
