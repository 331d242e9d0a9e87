use crate::{
    converter::{mismatch, BindingConfig, ValueConverter},
    typesystem::{EnumTypeRc, EnumValue, Value, WireType},
    Error, Result,
};

/// Converter for enumerations and nullable enumerations
///
/// Strings are read as a member name or as a number, integral values of any width are accepted
/// as the numeric value. Like the runtime, numeric values do not have to name a defined member.
#[derive(Debug)]
pub struct EnumConverter {
    wire_type: WireType,
    enum_type: EnumTypeRc,
    config: BindingConfig,
}

impl EnumConverter {
    /// Create a new converter bound to `wire_type`, returns `None` if it is not an enumeration
    #[must_use]
    pub fn new(wire_type: WireType, config: BindingConfig) -> Option<Self> {
        let enum_type = wire_type.as_enum()?.clone();
        Some(EnumConverter {
            wire_type,
            enum_type,
            config,
        })
    }

    fn carries(&self, payload: &WireType) -> bool {
        match payload.as_envelope() {
            Some((_, inner)) => self.carries(inner),
            None => payload.as_enum() == Some(&self.enum_type),
        }
    }

    fn enum_value(&self, value: i64) -> Value {
        Value::Enum(EnumValue {
            enum_type: self.enum_type.clone(),
            value,
        })
    }

    fn parse(&self, input: &str) -> Result<Value> {
        let input = if self.config.trim_whitespace {
            input.trim()
        } else {
            input
        };
        if input.is_empty() && self.wire_type.is_nullable() {
            return Ok(Value::Null);
        }

        if let Some(value) = self.enum_type.value_of(input, self.config.enum_ignore_case) {
            return Ok(self.enum_value(value));
        }

        match input.parse::<i64>() {
            Ok(value) => Ok(self.enum_value(value)),
            Err(_) => Err(Error::InvalidFormat {
                to: self.wire_type.to_string(),
                input: input.to_string(),
                message: format!("'{input}' is not a member of {}", self.enum_type.fullname()),
            }),
        }
    }
}

impl ValueConverter for EnumConverter {
    fn wire_type(&self) -> &WireType {
        &self.wire_type
    }

    fn can_convert_from_string(&self) -> bool {
        true
    }

    /// Every integral type is accepted, a `System.UInt64` value above `i64::MAX` still fails
    /// to convert.
    fn can_convert_from_type(&self, candidate: &WireType) -> bool {
        if let Some((_, payload)) = candidate.as_envelope() {
            return self.carries(payload);
        }
        if *candidate == WireType::STRING || self.carries(candidate) {
            return true;
        }
        candidate
            .as_primitive()
            .is_some_and(|kind| kind.is_integral())
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null if self.wire_type.is_nullable() => Ok(Value::Null),
            Value::Null => Ok(self.enum_value(0)),
            Value::Enum(value) if value.enum_type == self.enum_type => Ok(Value::Enum(value)),
            Value::Envelope(envelope) if self.carries(&envelope.payload_type) => {
                self.convert(envelope.payload)
            }
            Value::String(input) => self.parse(&input),
            Value::Enum(_) => Err(mismatch(&value, &self.wire_type)),
            Value::U8(number) if i64::try_from(number).is_err() => Err(Error::InvalidFormat {
                to: self.wire_type.to_string(),
                input: number.to_string(),
                message: format!(
                    "{number} overflows the 64-bit signed range of {}",
                    self.enum_type.fullname()
                ),
            }),
            other => match other.as_i64() {
                Some(number) => Ok(self.enum_value(number)),
                None => Err(mismatch(&other, &self.wire_type)),
            },
        }
    }
}
