//! Type-driven conversion of parameter values.
//!
//! Every parameter type has exactly one [`ValueConverter`], which knows how to move values
//! between the parameter's declared type, raw values of related types, strings (e.g. taken
//! from a URI) and the generic wrapper shapes that carry a payload plus its format.
//!
//! # Key Components
//!
//! - [`ValueConverter`]: The conversion capability of a single type
//! - [`ConverterRegistry`]: Process-wide, thread-safe cache of converters keyed by type
//! - [`BindingConfig`]: Parsing and wrapping options shared by the converters of a registry
//!
//! # Converter Variants
//!
//! The registry selects a variant by inspecting the shape of the requested type:
//!
//! | Type shape                 | Variant                                 |
//! |----------------------------|-----------------------------------------|
//! | `HttpResponseMessage<T>`   | message converter (response)            |
//! | `HttpRequestMessage<T>`    | message converter (request)             |
//! | `ObjectContent<T>`         | content converter                       |
//! | `HttpContent`              | raw content converter (pass-through)    |
//! | enumerations, `E?`         | enum converter                          |
//! | everything else            | plain value converter                   |
//!
//! # Examples
//!
//! ```rust
//! use httpbind::{converter::ConverterRegistry, typesystem::{Value, WireType}};
//!
//! let nullable_int = WireType::nullable(WireType::I4)?;
//! let converter = ConverterRegistry::global().value_converter(&nullable_int);
//!
//! assert!(converter.can_convert_from_string());
//! assert_eq!(converter.convert(Value::from("42"))?, Value::I4(42));
//! assert_eq!(converter.convert(Value::Null)?, Value::Null);
//! # Ok::<(), httpbind::Error>(())
//! ```

mod config;
mod enumeration;
mod envelope;
mod plain;
mod raw;
mod registry;

use std::{fmt, sync::Arc};

pub use config::BindingConfig;
pub use enumeration::EnumConverter;
pub use envelope::{ContentConverter, MessageConverter};
pub use plain::PlainConverter;
pub use raw::RawContentConverter;
pub use registry::ConverterRegistry;

use crate::{
    typesystem::{Value, WireType},
    Error, Result,
};

/// Reference to a shared `ValueConverter`
pub type ValueConverterRc = Arc<dyn ValueConverter>;

/// The conversion capability of a single type
///
/// Converters are stateless beyond the type they are bound to and the configuration they were
/// created with, so one instance is shared by every caller that needs to convert into that type.
pub trait ValueConverter: Send + Sync + fmt::Debug {
    /// The type this converter produces values of
    ///
    /// For wrapper converters this is the wrapper type itself, the inner type is available
    /// through [`ValueConverter::payload_type`].
    fn wire_type(&self) -> &WireType;

    /// The payload type of a wrapper converter, the bound type otherwise
    fn payload_type(&self) -> &WireType {
        self.wire_type()
    }

    /// Check if a value of the bound type can be created from its textual representation
    fn can_convert_from_string(&self) -> bool;

    /// Check if a value of `candidate` type can be adapted into the bound type
    fn can_convert_from_type(&self, candidate: &WireType) -> bool;

    /// Adapt `value` into a value of the bound type
    ///
    /// ## Arguments
    /// * `value` - The value to convert, `Value::Null` included
    ///
    /// # Errors
    /// Returns [`Error::ConversionMismatch`] if the runtime type of `value` cannot be adapted,
    /// or [`Error::InvalidFormat`] if `value` is a string that does not parse.
    fn convert(&self, value: Value) -> Result<Value>;

    /// Create a value of the bound type from its textual representation
    ///
    /// # Errors
    /// Returns [`Error::ConversionMismatch`] if the bound type has no textual representation,
    /// or [`Error::InvalidFormat`] if `input` does not parse.
    fn convert_from_string(&self, input: &str) -> Result<Value> {
        if !self.can_convert_from_string() {
            return Err(Error::ConversionMismatch {
                from: WireType::STRING.to_string(),
                to: self.wire_type().to_string(),
            });
        }
        self.convert(Value::from(input))
    }

    /// Produce the textual representation of `value`, the inverse of
    /// [`ValueConverter::convert_from_string`]
    ///
    /// Returns `None` for null.
    ///
    /// # Errors
    /// Returns [`Error::ConversionMismatch`] if the bound type has no textual representation or
    /// `value` cannot be adapted into the bound type.
    fn convert_to_string(&self, value: &Value) -> Result<Option<String>> {
        if !self.can_convert_from_string() {
            return Err(mismatch(value, self.wire_type()));
        }

        match self.convert(value.clone())? {
            Value::Null => Ok(None),
            converted => Ok(Some(converted.to_string())),
        }
    }
}

/// Build the error for a value that cannot be adapted to `target`
pub(crate) fn mismatch(value: &Value, target: &WireType) -> Error {
    Error::ConversionMismatch {
        from: value.type_name(),
        to: target.to_string(),
    }
}
