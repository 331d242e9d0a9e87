use crate::{
    converter::{mismatch, ValueConverter},
    typesystem::{Value, WireType},
    Result,
};

/// Pass-through converter for raw `HttpContent`
#[derive(Debug, Default)]
pub struct RawContentConverter;

impl RawContentConverter {
    /// Create a new raw content converter
    #[must_use]
    pub fn new() -> Self {
        RawContentConverter
    }
}

impl ValueConverter for RawContentConverter {
    fn wire_type(&self) -> &WireType {
        &WireType::RawContent
    }

    fn can_convert_from_string(&self) -> bool {
        false
    }

    fn can_convert_from_type(&self, candidate: &WireType) -> bool {
        *candidate == WireType::RawContent
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null | Value::RawContent(_) => Ok(value),
            other => Err(mismatch(&other, &WireType::RawContent)),
        }
    }
}
