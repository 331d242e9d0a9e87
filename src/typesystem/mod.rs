//! Structural type identifiers and runtime values for parameter binding.
//!
//! Operations are declared without reflection, so the types of their parameters are described
//! by the structural identifier [`WireType`]. Two `WireType`s are the same type iff they are
//! structurally equal, which makes them usable as keys of the converter cache.
//!
//! # Key Components
//!
//! - [`WireType`]: The type of a parameter, return value or runtime value
//! - [`PrimitiveKind`]: Built-in primitive types (int32, string, guid, ...)
//! - [`EnumType`] / [`ClassType`]: User defined enumerations and reference types
//! - [`EnvelopeKind`]: The generic wrapper shapes (content, request, response)
//! - [`Value`]: A dynamically typed runtime value
//!
//! # Examples
//!
//! ```rust
//! use httpbind::typesystem::{EnvelopeKind, WireType};
//!
//! let nullable_int = WireType::nullable(WireType::I4)?;
//! assert_eq!(nullable_int.to_string(), "System.Nullable`1[System.Int32]");
//!
//! let customer = WireType::class("MyApp", "Customer")?;
//! let content = WireType::envelope(EnvelopeKind::Content, customer.clone());
//! assert_eq!(content.as_envelope(), Some((EnvelopeKind::Content, &customer)));
//! # Ok::<(), httpbind::Error>(())
//! ```

mod primitives;
mod value;

use std::{fmt, sync::Arc};

use strum::{EnumIter, EnumString};

pub(crate) use primitives::{format_date_time, format_time_span};
pub use primitives::PrimitiveKind;
pub use value::{Envelope, EnumValue, ObjectValue, RawContent, Value};

use crate::Result;

/// Reference to an `EnumType`
pub type EnumTypeRc = Arc<EnumType>;
/// Reference to a `ClassType`
pub type ClassTypeRc = Arc<ClassType>;

/// The serialization format a content envelope carries its payload in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum ContentFormat {
    /// XML via the data contract serializer
    #[default]
    Xml,
    /// JSON
    Json,
    /// Plain text
    Text,
    /// Opaque bytes
    Binary,
}

impl ContentFormat {
    /// The media type associated with this format
    #[must_use]
    pub fn media_type(&self) -> &'static str {
        match self {
            ContentFormat::Xml => "application/xml",
            ContentFormat::Json => "application/json",
            ContentFormat::Text => "text/plain",
            ContentFormat::Binary => "application/octet-stream",
        }
    }
}

/// The generic wrapper shapes a payload of type `T` can travel in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum EnvelopeKind {
    /// `ObjectContent<T>` - a payload plus its serialization format
    Content,
    /// `HttpRequestMessage<T>` - a request carrying a payload
    Request,
    /// `HttpResponseMessage<T>` - a response carrying a payload
    Response,
}

impl EnvelopeKind {
    /// Name of the generic type definition
    #[must_use]
    pub fn generic_name(&self) -> &'static str {
        match self {
            EnvelopeKind::Content => "System.Net.Http.ObjectContent`1",
            EnvelopeKind::Request => "System.Net.Http.HttpRequestMessage`1",
            EnvelopeKind::Response => "System.Net.Http.HttpResponseMessage`1",
        }
    }
}

/// A user defined enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    /// `TypeNamespace` (can be empty)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// The named members and their values, in declaration order
    pub members: Vec<(String, i64)>,
}

impl EnumType {
    /// Create a new enumeration without members
    ///
    /// ## Arguments
    /// * `namespace` - The namespace of the enumeration, can be empty
    /// * `name`      - The name of the enumeration
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn new(namespace: &str, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "an enum type requires a name"));
        }

        Ok(EnumType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            members: Vec::new(),
        })
    }

    /// Add a named member
    #[must_use]
    pub fn member(mut self, name: &str, value: i64) -> Self {
        self.members.push((name.to_string(), value));
        self
    }

    /// Look up the value of a member by name
    #[must_use]
    pub fn value_of(&self, name: &str, ignore_case: bool) -> Option<i64> {
        self.members
            .iter()
            .find(|(member, _)| {
                if ignore_case {
                    member.eq_ignore_ascii_case(name)
                } else {
                    member == name
                }
            })
            .map(|(_, value)| *value)
    }

    /// Look up the name of the first member with `value`
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, member_value)| *member_value == value)
            .map(|(name, _)| name.as_str())
    }

    /// Returns the full name (Namespace.Name) of the enumeration
    #[must_use]
    pub fn fullname(&self) -> String {
        join_name(&self.namespace, &self.name)
    }
}

/// A user defined reference type, e.g. a data contract
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// `TypeNamespace` (can be empty)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
}

impl ClassType {
    /// Returns the full name (Namespace.Name) of the class
    #[must_use]
    pub fn fullname(&self) -> String {
        join_name(&self.namespace, &self.name)
    }
}

fn join_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// The type of a parameter, a return value or a runtime value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    /// A built-in type
    Primitive(PrimitiveKind),
    /// `Nullable<T>` over a value type
    Nullable(Box<WireType>),
    /// A user defined enumeration
    Enum(EnumTypeRc),
    /// A user defined reference type
    Class(ClassTypeRc),
    /// A generic wrapper around a payload type
    Envelope(EnvelopeKind, Box<WireType>),
    /// The non-generic carrier of raw content bytes
    RawContent,
    /// No value
    Void,
}

impl WireType {
    /// System.Boolean
    pub const BOOLEAN: WireType = WireType::Primitive(PrimitiveKind::Boolean);
    /// System.Char
    pub const CHAR: WireType = WireType::Primitive(PrimitiveKind::Char);
    /// System.SByte
    pub const I1: WireType = WireType::Primitive(PrimitiveKind::I1);
    /// System.Byte
    pub const U1: WireType = WireType::Primitive(PrimitiveKind::U1);
    /// System.Int16
    pub const I2: WireType = WireType::Primitive(PrimitiveKind::I2);
    /// System.UInt16
    pub const U2: WireType = WireType::Primitive(PrimitiveKind::U2);
    /// System.Int32
    pub const I4: WireType = WireType::Primitive(PrimitiveKind::I4);
    /// System.UInt32
    pub const U4: WireType = WireType::Primitive(PrimitiveKind::U4);
    /// System.Int64
    pub const I8: WireType = WireType::Primitive(PrimitiveKind::I8);
    /// System.UInt64
    pub const U8: WireType = WireType::Primitive(PrimitiveKind::U8);
    /// System.Single
    pub const R4: WireType = WireType::Primitive(PrimitiveKind::R4);
    /// System.Double
    pub const R8: WireType = WireType::Primitive(PrimitiveKind::R8);
    /// System.String
    pub const STRING: WireType = WireType::Primitive(PrimitiveKind::String);
    /// System.Guid
    pub const GUID: WireType = WireType::Primitive(PrimitiveKind::Guid);
    /// System.DateTime
    pub const DATE_TIME: WireType = WireType::Primitive(PrimitiveKind::DateTime);
    /// System.TimeSpan
    pub const TIME_SPAN: WireType = WireType::Primitive(PrimitiveKind::TimeSpan);
    /// System.DateTimeOffset
    pub const DATE_TIME_OFFSET: WireType = WireType::Primitive(PrimitiveKind::DateTimeOffset);
    /// System.Object
    pub const OBJECT: WireType = WireType::Primitive(PrimitiveKind::Object);

    /// Create `Nullable<T>`
    ///
    /// ## Arguments
    /// * `inner` - The value type to make nullable
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `inner` is not a non-nullable value type.
    pub fn nullable(inner: WireType) -> Result<Self> {
        if inner.is_nullable() {
            return Err(invalid_argument!(
                "inner",
                "'{}' is already nullable",
                inner
            ));
        }
        if !inner.is_value_type() {
            return Err(invalid_argument!(
                "inner",
                "only value types can be nullable, '{}' is a reference type",
                inner
            ));
        }

        Ok(WireType::Nullable(Box::new(inner)))
    }

    /// Create a wrapper of `payload`
    ///
    /// ## Arguments
    /// * `kind`    - The shape of the wrapper
    /// * `payload` - The type of the carried payload
    #[must_use]
    pub fn envelope(kind: EnvelopeKind, payload: WireType) -> Self {
        WireType::Envelope(kind, Box::new(payload))
    }

    /// Create a reference to a user defined class
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn class(namespace: &str, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "a class type requires a name"));
        }

        Ok(WireType::Class(Arc::new(ClassType {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })))
    }

    /// Create a reference to a user defined enumeration
    #[must_use]
    pub fn enumeration(enum_type: EnumType) -> Self {
        WireType::Enum(Arc::new(enum_type))
    }

    /// Check if this is a value type (nullable value types included)
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            WireType::Primitive(kind) => kind.is_value_type(),
            WireType::Nullable(_) | WireType::Enum(_) => true,
            WireType::Class(_) | WireType::Envelope(..) | WireType::RawContent | WireType::Void => {
                false
            }
        }
    }

    /// Check if this is `Nullable<T>`
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, WireType::Nullable(_))
    }

    /// Check if `null` is a legal value of this type
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        self.is_nullable() || !self.is_value_type()
    }

    /// The type with `Nullable<>` stripped
    #[must_use]
    pub fn underlying_type(&self) -> &WireType {
        match self {
            WireType::Nullable(inner) => inner,
            other => other,
        }
    }

    /// The shape and payload type if this is a wrapper type
    #[must_use]
    pub fn as_envelope(&self) -> Option<(EnvelopeKind, &WireType)> {
        match self {
            WireType::Envelope(kind, payload) => Some((*kind, payload)),
            _ => None,
        }
    }

    /// The enumeration definition, looking through `Nullable<>`
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumTypeRc> {
        match self.underlying_type() {
            WireType::Enum(enum_type) => Some(enum_type),
            _ => None,
        }
    }

    /// The primitive kind, looking through `Nullable<>`
    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.underlying_type() {
            WireType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The `default(T)` of this type
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            WireType::Primitive(kind) => kind.default_value(),
            WireType::Enum(enum_type) => Value::Enum(EnumValue {
                enum_type: enum_type.clone(),
                value: 0,
            }),
            _ => Value::Null,
        }
    }

    /// Check if `value` is an instance of this type
    ///
    /// `null` is an instance of every type that accepts null. A nullable value type is
    /// represented by its underlying value, and every value is an instance of `System.Object`.
    #[must_use]
    pub fn is_instance(&self, value: &Value) -> bool {
        match value.runtime_type() {
            None => self.accepts_null(),
            Some(_) if *self == WireType::OBJECT => true,
            Some(runtime_type) => runtime_type == *self.underlying_type(),
        }
    }
}

impl From<PrimitiveKind> for WireType {
    fn from(kind: PrimitiveKind) -> Self {
        WireType::Primitive(kind)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Primitive(kind) => write!(f, "{kind}"),
            WireType::Nullable(inner) => write!(f, "System.Nullable`1[{inner}]"),
            WireType::Enum(enum_type) => write!(f, "{}", enum_type.fullname()),
            WireType::Class(class_type) => write!(f, "{}", class_type.fullname()),
            WireType::Envelope(kind, payload) => write!(f, "{}[{payload}]", kind.generic_name()),
            WireType::RawContent => write!(f, "System.Net.Http.HttpContent"),
            WireType::Void => write!(f, "System.Void"),
        }
    }
}
