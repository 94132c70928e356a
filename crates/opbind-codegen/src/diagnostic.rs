//! Generation diagnostics
//!
//! Problems found while analysing a contract or an implementation are
//! collected rather than raised, so the remaining operations still
//! generate. Each diagnostic renders as a `compile_error!` at its span.

use std::fmt;

use proc_macro2::{Span, TokenStream};

/// Kind of generation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// An injected parameter names both a message property and a service key
    ConflictingBinding,
    /// A message property binding has an empty name
    EmptyPropertyName,
    /// An `#[inject(...)]` argument is not recognised
    UnknownInjectArgument,
    /// A binding that can fail is used by an operation that cannot return an error
    InfallibleReturn,
    /// A service binding has a type other than `Arc<T>` or `Option<Arc<T>>`
    UnsupportedServiceType,
    /// An operation does not take `&self`
    InvalidReceiver,
    /// An operation is generic or takes `impl Trait`
    GenericOperation,
    /// An input parameter is a shared reference
    SharedReference,
    /// `#[out]` on a parameter that is not `&mut T`
    InvalidOut,
    /// A parameter pattern is not a plain identifier
    InvalidPattern,
    /// A contract item that is not a method
    UnsupportedItem,
    /// Attribute arguments could not be parsed
    InvalidAttribute,
}

impl DiagnosticCode {
    /// Stable code printed with the message
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConflictingBinding => "OPB001",
            Self::EmptyPropertyName => "OPB002",
            Self::UnknownInjectArgument => "OPB003",
            Self::InfallibleReturn => "OPB004",
            Self::UnsupportedServiceType => "OPB005",
            Self::InvalidReceiver => "OPB010",
            Self::GenericOperation => "OPB011",
            Self::SharedReference => "OPB012",
            Self::InvalidOut => "OPB013",
            Self::InvalidPattern => "OPB014",
            Self::UnsupportedItem => "OPB015",
            Self::InvalidAttribute => "OPB020",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generation problem
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Problem kind
    pub code: DiagnosticCode,
    /// Human readable description
    pub message: String,
    /// Where the problem is reported
    pub span: Span,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(code: DiagnosticCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }

    /// Render as a `compile_error!` invocation
    pub fn to_compile_error(&self) -> TokenStream {
        syn::Error::new(self.span, self.to_string()).to_compile_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<syn::Error> for Diagnostic {
    fn from(error: syn::Error) -> Self {
        Self::new(DiagnosticCode::InvalidAttribute, error.span(), error.to_string())
    }
}

/// Render every diagnostic
pub fn render(diagnostics: &[Diagnostic]) -> TokenStream {
    diagnostics.iter().map(Diagnostic::to_compile_error).collect()
}
