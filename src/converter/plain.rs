use crate::{
    converter::{mismatch, BindingConfig, ValueConverter},
    typesystem::{PrimitiveKind, Value, WireType},
    Result,
};

/// Converter for primitives, nullable value types, strings and plain reference types
///
/// Accepts values of the bound type as-is, unwraps any wrapper that carries the bound type, maps
/// null to `default(T)` for non-nullable value types and parses strings for every primitive with
/// an invariant textual form.
#[derive(Debug)]
pub struct PlainConverter {
    wire_type: WireType,
    config: BindingConfig,
}

impl PlainConverter {
    /// Create a new converter bound to `wire_type`
    #[must_use]
    pub fn new(wire_type: WireType, config: BindingConfig) -> Self {
        PlainConverter { wire_type, config }
    }

    /// The primitive the bound type parses strings as, if any
    fn parsable_kind(&self) -> Option<PrimitiveKind> {
        match self.wire_type.as_primitive() {
            Some(PrimitiveKind::Object) | None => None,
            Some(kind) => Some(kind),
        }
    }

    /// Check if a wrapper declared with `payload` carries a value of the bound type
    fn carries(&self, payload: &WireType) -> bool {
        match payload.as_envelope() {
            Some((_, inner)) => self.carries(inner),
            None => payload.underlying_type() == self.wire_type.underlying_type(),
        }
    }

    fn null_value(&self) -> Value {
        if self.wire_type.accepts_null() {
            Value::Null
        } else {
            self.wire_type.default_value()
        }
    }

    fn parse(&self, kind: PrimitiveKind, input: &str) -> Result<Value> {
        if kind == PrimitiveKind::String {
            return Ok(Value::from(input));
        }

        // a char is exactly its text, whitespace included
        let input = if self.config.trim_whitespace && kind != PrimitiveKind::Char {
            input.trim()
        } else {
            input
        };
        if input.is_empty() && self.wire_type.is_nullable() {
            return Ok(Value::Null);
        }

        kind.parse(input)
    }
}

impl ValueConverter for PlainConverter {
    fn wire_type(&self) -> &WireType {
        &self.wire_type
    }

    fn can_convert_from_string(&self) -> bool {
        self.parsable_kind().is_some()
    }

    fn can_convert_from_type(&self, candidate: &WireType) -> bool {
        if self.wire_type == WireType::OBJECT {
            return true;
        }

        match candidate.as_envelope() {
            Some((_, payload)) => self.carries(payload),
            None if *candidate == WireType::STRING => self.can_convert_from_string(),
            None => candidate.underlying_type() == self.wire_type.underlying_type(),
        }
    }

    fn convert(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(self.null_value());
        }
        if self.wire_type.is_instance(&value) {
            return Ok(value);
        }

        match value {
            Value::Envelope(envelope) if self.carries(&envelope.payload_type) => {
                self.convert(envelope.payload)
            }
            Value::String(input) => match self.parsable_kind() {
                Some(kind) => self.parse(kind, &input),
                None => Err(mismatch(&Value::String(input), &self.wire_type)),
            },
            other => Err(mismatch(&other, &self.wire_type)),
        }
    }
}
