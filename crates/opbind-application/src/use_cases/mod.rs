//! Use cases

pub mod dispatch;

pub use dispatch::OperationDispatcher;
