use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use uguid::Guid;

use crate::{
    typesystem::{
        format_date_time, format_time_span, ClassTypeRc, ContentFormat, EnumTypeRc, EnvelopeKind,
        PrimitiveKind, WireType,
    },
    Result,
};

/// A value of a user defined enumeration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// The enumeration this value belongs to
    pub enum_type: EnumTypeRc,
    /// The numeric value
    pub value: i64,
}

/// An instance of a user defined reference type
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    /// The class of this instance
    pub class_type: ClassTypeRc,
    /// Member values, in declaration order
    pub fields: Vec<(String, Value)>,
}

impl ObjectValue {
    /// Create an instance without members
    #[must_use]
    pub fn new(class_type: ClassTypeRc) -> Self {
        ObjectValue {
            class_type,
            fields: Vec::new(),
        }
    }

    /// Add a member value
    #[must_use]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }

    /// Look up a member value by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// Raw content bytes with their media type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawContent {
    /// The media type of `bytes`, e.g. `application/octet-stream`
    pub media_type: String,
    /// The content itself
    pub bytes: Vec<u8>,
}

/// A payload travelling inside one of the generic wrapper shapes
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// The wrapper shape
    pub kind: EnvelopeKind,
    /// The declared type of the payload (the `T` of the wrapper)
    pub payload_type: WireType,
    /// The payload itself
    pub payload: Value,
    /// The format the payload is serialized with
    pub format: ContentFormat,
}

impl Envelope {
    /// Wrap `payload` explicitly
    ///
    /// ## Arguments
    /// * `kind`         - The wrapper shape
    /// * `payload_type` - The `T` of the wrapper
    /// * `payload`      - The payload, must be an instance of `payload_type`
    /// * `format`       - The serialization format of the payload
    ///
    /// # Errors
    /// Returns [`crate::Error::ConversionMismatch`] if `payload` is not an instance of
    /// `payload_type`.
    pub fn new(
        kind: EnvelopeKind,
        payload_type: WireType,
        payload: Value,
        format: ContentFormat,
    ) -> Result<Self> {
        if !payload_type.is_instance(&payload) {
            return Err(crate::Error::ConversionMismatch {
                from: payload.type_name(),
                to: payload_type.to_string(),
            });
        }

        Ok(Envelope {
            kind,
            payload_type,
            payload,
            format,
        })
    }

    /// Wrap `payload` as content in the default format
    ///
    /// # Errors
    /// See [`Envelope::new`].
    pub fn content(payload_type: WireType, payload: Value) -> Result<Self> {
        Self::new(
            EnvelopeKind::Content,
            payload_type,
            payload,
            ContentFormat::default(),
        )
    }

    /// Wrap `payload` as the body of a request
    ///
    /// # Errors
    /// See [`Envelope::new`].
    pub fn request(payload_type: WireType, payload: Value) -> Result<Self> {
        Self::new(
            EnvelopeKind::Request,
            payload_type,
            payload,
            ContentFormat::default(),
        )
    }

    /// Wrap `payload` as the body of a response
    ///
    /// # Errors
    /// See [`Envelope::new`].
    pub fn response(payload_type: WireType, payload: Value) -> Result<Self> {
        Self::new(
            EnvelopeKind::Response,
            payload_type,
            payload,
            ContentFormat::default(),
        )
    }

    /// The type of this envelope, e.g. `ObjectContent<T>`
    #[must_use]
    pub fn wire_type(&self) -> WireType {
        WireType::envelope(self.kind, self.payload_type.clone())
    }
}

/// A dynamically typed runtime value
///
/// This is the unit that moves between the wire and a call: parameters are converted from and
/// into `Value`s by their converter. A nullable value type has no variant of its own, a non-null
/// `Nullable<T>` is represented by its underlying `T`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Character value
    Char(char),
    /// 8-bit signed integer
    I1(i8),
    /// 8-bit unsigned integer
    U1(u8),
    /// 16-bit signed integer
    I2(i16),
    /// 16-bit unsigned integer
    U2(u16),
    /// 32-bit signed integer
    I4(i32),
    /// 32-bit unsigned integer
    U4(u32),
    /// 64-bit signed integer
    I8(i64),
    /// 64-bit unsigned integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
    /// GUID value
    Guid(Guid),
    /// Date and time without offset
    DateTime(NaiveDateTime),
    /// Time interval
    TimeSpan(TimeDelta),
    /// Date and time with offset
    DateTimeOffset(DateTime<FixedOffset>),
    /// Enumeration value
    Enum(EnumValue),
    /// Instance of a user defined class
    Object(ObjectValue),
    /// A wrapped payload
    Envelope(Box<Envelope>),
    /// Raw content bytes
    RawContent(RawContent),
}

impl Value {
    /// Check if this is `Null`
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type of this value, `None` for `Null`
    #[must_use]
    pub fn runtime_type(&self) -> Option<WireType> {
        let kind = match self {
            Value::Null => return None,
            Value::Enum(value) => return Some(WireType::Enum(value.enum_type.clone())),
            Value::Object(value) => return Some(WireType::Class(value.class_type.clone())),
            Value::Envelope(envelope) => return Some(envelope.wire_type()),
            Value::RawContent(_) => return Some(WireType::RawContent),
            Value::Boolean(_) => PrimitiveKind::Boolean,
            Value::Char(_) => PrimitiveKind::Char,
            Value::I1(_) => PrimitiveKind::I1,
            Value::U1(_) => PrimitiveKind::U1,
            Value::I2(_) => PrimitiveKind::I2,
            Value::U2(_) => PrimitiveKind::U2,
            Value::I4(_) => PrimitiveKind::I4,
            Value::U4(_) => PrimitiveKind::U4,
            Value::I8(_) => PrimitiveKind::I8,
            Value::U8(_) => PrimitiveKind::U8,
            Value::R4(_) => PrimitiveKind::R4,
            Value::R8(_) => PrimitiveKind::R8,
            Value::String(_) => PrimitiveKind::String,
            Value::Guid(_) => PrimitiveKind::Guid,
            Value::DateTime(_) => PrimitiveKind::DateTime,
            Value::TimeSpan(_) => PrimitiveKind::TimeSpan,
            Value::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
        };
        Some(WireType::Primitive(kind))
    }

    /// Name of the runtime type, used in error messages
    #[must_use]
    pub fn type_name(&self) -> String {
        match self.runtime_type() {
            Some(runtime_type) => runtime_type.to_string(),
            None => "null".to_string(),
        }
    }

    /// Try to get the value of an integral value (enum values included)
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I1(value) => Some(i64::from(*value)),
            Value::U1(value) => Some(i64::from(*value)),
            Value::I2(value) => Some(i64::from(*value)),
            Value::U2(value) => Some(i64::from(*value)),
            Value::I4(value) => Some(i64::from(*value)),
            Value::U4(value) => Some(i64::from(*value)),
            Value::I8(value) => Some(*value),
            Value::U8(value) => i64::try_from(*value).ok(),
            Value::Enum(value) => Some(value.value),
            _ => None,
        }
    }

    /// Try to get a string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Try to get the wrapped payload
    #[must_use]
    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Value::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// The invariant textual form, which parses back into the same value
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "{value}"),
            Value::I1(value) => write!(f, "{value}"),
            Value::U1(value) => write!(f, "{value}"),
            Value::I2(value) => write!(f, "{value}"),
            Value::U2(value) => write!(f, "{value}"),
            Value::I4(value) => write!(f, "{value}"),
            Value::U4(value) => write!(f, "{value}"),
            Value::I8(value) => write!(f, "{value}"),
            Value::U8(value) => write!(f, "{value}"),
            Value::R4(value) => write!(f, "{value}"),
            Value::R8(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value}"),
            Value::Guid(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{}", format_date_time(value)),
            Value::TimeSpan(value) => write!(f, "{}", format_time_span(value)),
            Value::DateTimeOffset(value) => write!(f, "{}", value.to_rfc3339()),
            Value::Enum(value) => match value.enum_type.name_of(value.value) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "{}", value.value),
            },
            Value::Object(value) => write!(f, "{}", value.class_type.fullname()),
            Value::Envelope(envelope) => write!(f, "{}", envelope.payload),
            Value::RawContent(content) => {
                write!(f, "{} bytes of {}", content.bytes.len(), content.media_type)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I4(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I8(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::R8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Guid> for Value {
    fn from(value: Guid) -> Self {
        Value::Guid(value)
    }
}

impl From<Envelope> for Value {
    fn from(value: Envelope) -> Self {
        Value::Envelope(Box::new(value))
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{typesystem::EnumType, Error};

    fn customer() -> (WireType, ClassTypeRc) {
        let wire_type = WireType::class("MyApp", "Customer").unwrap();
        let class_type = match &wire_type {
            WireType::Class(class_type) => class_type.clone(),
            _ => unreachable!(),
        };
        (wire_type, class_type)
    }

    #[test]
    fn test_runtime_types() {
        assert_eq!(Value::Null.runtime_type(), None);
        assert_eq!(Value::I4(1).runtime_type(), Some(WireType::I4));
        assert_eq!(Value::from("x").runtime_type(), Some(WireType::STRING));
        assert_eq!(
            Value::RawContent(RawContent::default()).runtime_type(),
            Some(WireType::RawContent)
        );

        let (customer_type, class_type) = customer();
        let instance = Value::from(ObjectValue::new(class_type));
        assert_eq!(instance.runtime_type(), Some(customer_type.clone()));

        let envelope = Envelope::response(customer_type.clone(), instance).unwrap();
        assert_eq!(
            Value::from(envelope).runtime_type(),
            Some(WireType::envelope(EnvelopeKind::Response, customer_type))
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Boolean(true).type_name(), "System.Boolean");
    }

    #[test]
    fn test_envelope_validates_payload() {
        assert!(Envelope::content(WireType::I4, Value::I4(3)).is_ok());
        assert!(Envelope::content(WireType::STRING, Value::Null).is_ok());
        assert!(Envelope::content(WireType::nullable(WireType::I4).unwrap(), Value::Null).is_ok());

        assert!(matches!(
            Envelope::content(WireType::I4, Value::Null),
            Err(Error::ConversionMismatch { .. })
        ));
        match Envelope::request(WireType::I4, Value::from("3")) {
            Err(Error::ConversionMismatch { from, to }) => {
                assert_eq!(from, "System.String");
                assert_eq!(to, "System.Int32");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::I4(-5).to_string(), "-5");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");

        let color = EnumType::new("MyApp", "Color").unwrap().member("Red", 2);
        let color = match WireType::enumeration(color) {
            WireType::Enum(enum_type) => enum_type,
            _ => unreachable!(),
        };
        let named = Value::Enum(EnumValue {
            enum_type: color.clone(),
            value: 2,
        });
        let unnamed = Value::Enum(EnumValue {
            enum_type: color,
            value: 9,
        });
        assert_eq!(named.to_string(), "Red");
        assert_eq!(unnamed.to_string(), "9");
        assert_eq!(named.as_i64(), Some(2));
    }

    #[test]
    fn test_object_fields() {
        let (_, class_type) = customer();
        let instance = ObjectValue::new(class_type)
            .with_field("Name", Value::from("Ada"))
            .with_field("Age", Value::I4(36));
        assert_eq!(instance.field("Age"), Some(&Value::I4(36)));
        assert_eq!(instance.field("Missing"), None);
    }
}
