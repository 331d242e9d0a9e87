//! HTTP view of service operations.
//!
//! An [`OperationDescriptor`] exposes the return value and the input and output parameters of
//! an operation to the dispatch layer, each parameter carrying the [`crate::converter`] that
//! moves its values between the wire and the call.
//!
//! Operations are either free-standing or derived from an
//! [`crate::description::OperationDescription`]. A derived operation holds no copy of the
//! description: its [`ParameterCollection`]s are projections that read the current messages on
//! every access and forward every edit. When a message has been removed the collections read
//! as empty, and the first addition recreates it.
//!
//! # Examples
//!
//! ```rust
//! use httpbind::{
//!     description::OperationBuilder,
//!     http::{OperationDescriptor, ParameterDescriptor},
//!     typesystem::{Value, WireType},
//! };
//!
//! let description = OperationBuilder::new("GetOrder")
//!     .parameter("id", WireType::I4)
//!     .returns(WireType::STRING)
//!     .build()?;
//! let mut operation = OperationDescriptor::from_description(description.clone());
//!
//! assert_eq!(operation.bind_arguments(vec![Value::from("7")])?, vec![Value::I4(7)]);
//!
//! description.clear_messages();
//! assert!(operation.input_parameters().is_empty());
//!
//! operation
//!     .input_parameters_mut()
//!     .add(ParameterDescriptor::new("id", WireType::I8)?);
//! assert_eq!(description.message_count(), 1);
//! # Ok::<(), httpbind::Error>(())
//! ```

mod collection;
mod operation;
mod parameter;

pub use collection::{Iter, ParameterCollection};
pub use operation::{
    OperationAttribute, OperationBehavior, OperationBehaviorRc, OperationDescriptor,
};
pub use parameter::ParameterDescriptor;
