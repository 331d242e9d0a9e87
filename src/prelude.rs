//! # httpbind Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! of the httpbind library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all httpbind operations
pub use crate::Error;

/// The result type used throughout httpbind
pub use crate::Result;

/// Configuration for value conversion
pub use crate::BindingConfig;

// ================================================================================================
// Type System
// ================================================================================================

/// Type identifiers
pub use crate::typesystem::{
    ClassType, ContentFormat, EnumType, EnvelopeKind, PrimitiveKind, WireType,
};

/// Runtime values
pub use crate::typesystem::{Envelope, EnumValue, ObjectValue, RawContent, Value};

// ================================================================================================
// Conversion
// ================================================================================================

/// Converters and their registry
pub use crate::converter::{ConverterRegistry, ValueConverter, ValueConverterRc};

// ================================================================================================
// Operation Descriptions
// ================================================================================================

/// The transport-neutral description model
pub use crate::description::{
    MessageBody, MessageDescription, MessageDirection, MessagePart, OperationBuilder,
    OperationDescription, OperationDescriptionRc, ParamFlags,
};

/// The HTTP view of operations
pub use crate::http::{
    OperationAttribute, OperationBehavior, OperationDescriptor, ParameterCollection,
    ParameterDescriptor,
};
