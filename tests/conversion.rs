//! Integration tests for the converter registry.
//!
//! Covers the laws every converter obeys (string round trip, idempotence, null defaults),
//! wrapper handling, and concurrent use of a shared registry.

use httpbind::{prelude::*, Result};
use std::{str::FromStr, sync::Arc, thread};
use strum::IntoEnumIterator;

fn samples(kind: PrimitiveKind) -> Vec<Value> {
    let value = match kind {
        PrimitiveKind::Boolean => Value::Boolean(true),
        PrimitiveKind::Char => {
            return vec![Value::Char('x'), Value::Char(' '), Value::Char('\t')];
        }
        PrimitiveKind::I1 => Value::I1(-12),
        PrimitiveKind::U1 => Value::U1(200),
        PrimitiveKind::I2 => Value::I2(-1234),
        PrimitiveKind::U2 => Value::U2(54321),
        PrimitiveKind::I4 => Value::I4(i32::MIN),
        PrimitiveKind::U4 => Value::U4(u32::MAX),
        PrimitiveKind::I8 => Value::I8(i64::MAX),
        PrimitiveKind::U8 => Value::U8(u64::MAX),
        PrimitiveKind::R4 => Value::R4(0.25),
        PrimitiveKind::R8 => Value::R8(-1.5e10),
        PrimitiveKind::String => Value::from("hello world"),
        PrimitiveKind::Guid => {
            match uguid::Guid::from_str("01234567-89ab-cdef-0123-456789abcdef") {
                Ok(guid) => Value::Guid(guid),
                Err(_) => return Vec::new(),
            }
        }
        PrimitiveKind::DateTime
        | PrimitiveKind::TimeSpan
        | PrimitiveKind::DateTimeOffset
        | PrimitiveKind::Object => return Vec::new(),
    };
    vec![value]
}

#[test]
fn test_string_round_trip() -> Result<()> {
    let registry = ConverterRegistry::default();
    for kind in PrimitiveKind::iter() {
        for value in samples(kind) {
            let nullable = WireType::nullable(WireType::from(kind)).unwrap_or(WireType::from(kind));
            for wire_type in [WireType::from(kind), nullable] {
                let converter = registry.value_converter(&wire_type);
                assert!(converter.can_convert_from_string(), "{wire_type}");

                let text = converter
                    .convert_to_string(&value)?
                    .expect("non-null value");
                assert_eq!(converter.convert_from_string(&text)?, value, "{wire_type}");
            }
        }
    }

    Ok(())
}

#[test]
fn test_idempotence() -> Result<()> {
    let registry = ConverterRegistry::default();
    for kind in PrimitiveKind::iter() {
        let converter = registry.value_converter(&WireType::from(kind));
        for value in samples(kind) {
            let once = converter.convert(value.clone())?;
            assert_eq!(once, value);
            assert_eq!(converter.convert(once)?, value);
        }
    }

    Ok(())
}

#[test]
fn test_null_defaults() -> Result<()> {
    let registry = ConverterRegistry::default();
    for kind in PrimitiveKind::iter() {
        let wire_type = WireType::from(kind);
        let converter = registry.value_converter(&wire_type);
        assert_eq!(converter.convert(Value::Null)?, wire_type.default_value());

        if let Ok(nullable) = WireType::nullable(wire_type) {
            let converter = registry.value_converter(&nullable);
            assert_eq!(converter.convert(Value::Null)?, Value::Null);
        }
    }

    assert_eq!(
        registry.value_converter(&WireType::I4).convert(Value::Null)?,
        Value::I4(0)
    );
    assert_eq!(
        registry
            .value_converter(&WireType::BOOLEAN)
            .convert(Value::Null)?,
        Value::Boolean(false)
    );

    Ok(())
}

#[test]
fn test_customer_content() -> Result<()> {
    let customer = WireType::class("MyApp", "Customer")?;
    let converter = ConverterRegistry::global()
        .value_converter(&WireType::envelope(EnvelopeKind::Content, customer.clone()));

    assert!(converter.can_convert_from_type(&customer));
    assert!(!converter.can_convert_from_type(&WireType::STRING));
    assert!(!converter.can_convert_from_string());
    assert!(matches!(
        converter.convert(Value::from("customer")),
        Err(Error::ConversionMismatch { .. })
    ));

    Ok(())
}

#[test]
fn test_unwrap_into_plain_type() -> Result<()> {
    let converter = ConverterRegistry::global().value_converter(&WireType::I4);
    let response = Envelope::response(WireType::I4, Value::I4(12))?;
    assert!(converter.can_convert_from_type(&response.wire_type()));
    assert_eq!(converter.convert(Value::from(response))?, Value::I4(12));

    Ok(())
}

#[test]
fn test_lenient_registry() -> Result<()> {
    let registry = ConverterRegistry::new(BindingConfig::lenient());
    let color = WireType::enumeration(EnumType::new("MyApp", "Color")?.member("Green", 2));

    let converter = registry.value_converter(&color);
    assert_eq!(converter.convert_from_string("GREEN")?.as_i64(), Some(2));

    let global = ConverterRegistry::global().value_converter(&color);
    assert!(global.convert_from_string("GREEN").is_err());

    Ok(())
}

#[test]
fn test_concurrent_registry() {
    let registry = Arc::new(ConverterRegistry::default());
    let types: Vec<WireType> = PrimitiveKind::iter().map(WireType::from).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let types = types.clone();
            thread::spawn(move || {
                types
                    .iter()
                    .map(|wire_type| registry.value_converter(wire_type))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<ValueConverterRc>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("lookup thread panicked"))
        .collect();

    for converters in &results[1..] {
        for (expected, actual) in results[0].iter().zip(converters) {
            assert!(Arc::ptr_eq(expected, actual));
        }
    }
    assert_eq!(registry.len(), types.len());
}
