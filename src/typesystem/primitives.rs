use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc};
use strum::{EnumCount, EnumIter};
use uguid::Guid;

use crate::{typesystem::Value, Error, Result};

/// Number of 100ns ticks per second, the resolution of a textual `TimeSpan`
const TICKS_PER_SECOND: i64 = 10_000_000;
/// Number of nanoseconds per tick
const NANOS_PER_TICK: i64 = 100;

/// Represents all built-in types that a parameter can be declared with (without data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - a single Unicode character
    Char,
    /// System.SByte - signed 8-bit integer
    I1,
    /// System.Byte - unsigned 8-bit integer
    U1,
    /// System.Int16 - signed 16-bit integer
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    U2,
    /// System.Int32 - signed 32-bit integer
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    U4,
    /// System.Int64 - signed 64-bit integer
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    U8,
    /// System.Single - 32-bit floating point
    R4,
    /// System.Double - 64-bit floating point
    R8,
    /// System.String - immutable string of Unicode characters
    String,
    /// System.Guid - 128-bit globally unique identifier
    Guid,
    /// System.DateTime - a date and time without offset
    DateTime,
    /// System.TimeSpan - a signed time interval
    TimeSpan,
    /// System.DateTimeOffset - a date and time with a UTC offset
    DateTimeOffset,
    /// System.Object - base class for all reference types
    Object,
}

impl PrimitiveKind {
    /// Get the CLR full type name (with namespace)
    #[must_use]
    pub fn clr_full_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "System.Boolean",
            PrimitiveKind::Char => "System.Char",
            PrimitiveKind::I1 => "System.SByte",
            PrimitiveKind::U1 => "System.Byte",
            PrimitiveKind::I2 => "System.Int16",
            PrimitiveKind::U2 => "System.UInt16",
            PrimitiveKind::I4 => "System.Int32",
            PrimitiveKind::U4 => "System.UInt32",
            PrimitiveKind::I8 => "System.Int64",
            PrimitiveKind::U8 => "System.UInt64",
            PrimitiveKind::R4 => "System.Single",
            PrimitiveKind::R8 => "System.Double",
            PrimitiveKind::String => "System.String",
            PrimitiveKind::Guid => "System.Guid",
            PrimitiveKind::DateTime => "System.DateTime",
            PrimitiveKind::TimeSpan => "System.TimeSpan",
            PrimitiveKind::DateTimeOffset => "System.DateTimeOffset",
            PrimitiveKind::Object => "System.Object",
        }
    }

    /// Get the short name (without namespace)
    #[must_use]
    pub fn name(&self) -> &'static str {
        let full_name = self.clr_full_name();
        full_name.strip_prefix("System.").unwrap_or(full_name)
    }

    /// Is this a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        !matches!(self, PrimitiveKind::String | PrimitiveKind::Object)
    }

    /// Is this one of the eight integral types
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::I1
                | PrimitiveKind::U1
                | PrimitiveKind::I2
                | PrimitiveKind::U2
                | PrimitiveKind::I4
                | PrimitiveKind::U4
                | PrimitiveKind::I8
                | PrimitiveKind::U8
        )
    }

    /// The `default(T)` of this type - zero for value types, null for reference types
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            PrimitiveKind::Boolean => Value::Boolean(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::I1 => Value::I1(0),
            PrimitiveKind::U1 => Value::U1(0),
            PrimitiveKind::I2 => Value::I2(0),
            PrimitiveKind::U2 => Value::U2(0),
            PrimitiveKind::I4 => Value::I4(0),
            PrimitiveKind::U4 => Value::U4(0),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::U8 => Value::U8(0),
            PrimitiveKind::R4 => Value::R4(0.0),
            PrimitiveKind::R8 => Value::R8(0.0),
            PrimitiveKind::Guid => Value::Guid(Guid::ZERO),
            PrimitiveKind::DateTime => Value::DateTime(min_date_time()),
            PrimitiveKind::TimeSpan => Value::TimeSpan(TimeDelta::zero()),
            PrimitiveKind::DateTimeOffset => Value::DateTimeOffset(
                DateTime::from_naive_utc_and_offset(min_date_time(), Utc.fix()),
            ),
            PrimitiveKind::String | PrimitiveKind::Object => Value::Null,
        }
    }

    /// Parse the textual representation of a value of this kind
    ///
    /// `System.Object` accepts any string as-is, since a string is an object.
    ///
    /// ## Arguments
    /// * `input` - The text to parse, already trimmed if trimming is desired
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if `input` is not a valid representation.
    pub fn parse(&self, input: &str) -> Result<Value> {
        match self {
            PrimitiveKind::Boolean => {
                if input.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if input.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err(self.format_error(input, "expected 'true' or 'false'"))
                }
            }
            PrimitiveKind::Char => {
                let mut chars = input.chars();
                match (chars.next(), chars.next()) {
                    (Some(value), None) => Ok(Value::Char(value)),
                    _ => Err(self.format_error(input, "expected exactly one character")),
                }
            }
            PrimitiveKind::I1 => self.parse_with(input, Value::I1),
            PrimitiveKind::U1 => self.parse_with(input, Value::U1),
            PrimitiveKind::I2 => self.parse_with(input, Value::I2),
            PrimitiveKind::U2 => self.parse_with(input, Value::U2),
            PrimitiveKind::I4 => self.parse_with(input, Value::I4),
            PrimitiveKind::U4 => self.parse_with(input, Value::U4),
            PrimitiveKind::I8 => self.parse_with(input, Value::I8),
            PrimitiveKind::U8 => self.parse_with(input, Value::U8),
            PrimitiveKind::R4 => self.parse_with(input, Value::R4),
            PrimitiveKind::R8 => self.parse_with(input, Value::R8),
            PrimitiveKind::Guid => self.parse_with(input, Value::Guid),
            PrimitiveKind::String | PrimitiveKind::Object => Ok(Value::String(input.to_string())),
            PrimitiveKind::DateTime => parse_date_time(input)
                .map(Value::DateTime)
                .ok_or_else(|| self.format_error(input, "expected an ISO 8601 date and time")),
            PrimitiveKind::DateTimeOffset => DateTime::parse_from_rfc3339(input)
                .map(Value::DateTimeOffset)
                .map_err(|error| self.format_error(input, error)),
            PrimitiveKind::TimeSpan => parse_time_span(input)
                .map(Value::TimeSpan)
                .ok_or_else(|| self.format_error(input, "expected [-][d.]hh:mm:ss[.fffffff]")),
        }
    }

    fn parse_with<T, F>(&self, input: &str, wrap: F) -> Result<Value>
    where
        T: FromStr,
        T::Err: fmt::Display,
        F: FnOnce(T) -> Value,
    {
        input
            .parse::<T>()
            .map(wrap)
            .map_err(|error| self.format_error(input, error))
    }

    fn format_error(&self, input: &str, message: impl fmt::Display) -> Error {
        Error::InvalidFormat {
            to: self.clr_full_name().to_string(),
            input: input.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clr_full_name())
    }
}

/// `DateTime.MinValue`, 0001-01-01T00:00:00
fn min_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::default())
}

fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::default()))
        })
}

/// Format a `DateTime` the way [`PrimitiveKind::parse`] reads it back
pub(crate) fn format_date_time(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parse `[-][d.]hh:mm:ss[.fffffff]`
fn parse_time_span(input: &str) -> Option<TimeDelta> {
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let mut fields = body.split(':');
    let (head, minutes, seconds) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (parse_digits(days)?, parse_digits(hours)?),
        None => (0, parse_digits(head)?),
    };
    let minutes = parse_digits(minutes)?;
    let (seconds, fraction) = match seconds.split_once('.') {
        Some((seconds, fraction)) => (parse_digits(seconds)?, parse_fraction(fraction)?),
        None => (parse_digits(seconds)?, 0),
    };

    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let total_seconds = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60 + seconds)?;
    let ticks = total_seconds
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(fraction)?;
    let nanos = ticks.checked_mul(NANOS_PER_TICK)?;

    Some(TimeDelta::nanoseconds(if negative { -nanos } else { nanos }))
}

fn parse_digits(input: &str) -> Option<i64> {
    if input.is_empty() || !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Up to seven fractional digits, scaled to ticks
fn parse_fraction(input: &str) -> Option<i64> {
    if input.len() > 7 {
        return None;
    }
    let digits = parse_digits(input)?;
    #[allow(clippy::cast_possible_truncation)]
    let scale = 10_i64.pow(7 - input.len() as u32);
    Some(digits * scale)
}

/// Format a `TimeSpan` as `[-][d.]hh:mm:ss[.fffffff]`
pub(crate) fn format_time_span(value: &TimeDelta) -> String {
    let nanos = value.num_nanoseconds().unwrap_or(if *value < TimeDelta::zero() {
        i64::MIN
    } else {
        i64::MAX
    });
    let negative = nanos < 0;
    let ticks = (nanos / NANOS_PER_TICK).unsigned_abs();

    #[allow(clippy::cast_sign_loss)]
    let ticks_per_second = TICKS_PER_SECOND as u64;
    let fraction = ticks % ticks_per_second;
    let total_seconds = ticks / ticks_per_second;
    let days = total_seconds / 86_400;
    let hours = (total_seconds / 3_600) % 24;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    let mut text = String::new();
    if negative {
        text.push('-');
    }
    if days > 0 {
        text.push_str(&format!("{days}."));
    }
    text.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if fraction > 0 {
        text.push_str(&format!(".{fraction:07}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names() {
        assert_eq!(PrimitiveKind::I4.clr_full_name(), "System.Int32");
        assert_eq!(PrimitiveKind::I4.name(), "Int32");
        assert_eq!(PrimitiveKind::U1.name(), "Byte");
        assert_eq!(PrimitiveKind::DateTimeOffset.to_string(), "System.DateTimeOffset");
        assert_eq!(PrimitiveKind::COUNT, PrimitiveKind::iter().count());
    }

    #[test]
    fn test_value_types() {
        assert!(PrimitiveKind::I4.is_value_type());
        assert!(PrimitiveKind::Guid.is_value_type());
        assert!(PrimitiveKind::TimeSpan.is_value_type());
        assert!(!PrimitiveKind::String.is_value_type());
        assert!(!PrimitiveKind::Object.is_value_type());

        assert!(PrimitiveKind::U8.is_integral());
        assert!(!PrimitiveKind::R8.is_integral());
        assert!(!PrimitiveKind::Char.is_integral());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(PrimitiveKind::I4.default_value(), Value::I4(0));
        assert_eq!(PrimitiveKind::Boolean.default_value(), Value::Boolean(false));
        assert_eq!(PrimitiveKind::Char.default_value(), Value::Char('\0'));
        assert_eq!(PrimitiveKind::Guid.default_value(), Value::Guid(Guid::ZERO));
        assert_eq!(PrimitiveKind::String.default_value(), Value::Null);
        assert_eq!(PrimitiveKind::Object.default_value(), Value::Null);

        match PrimitiveKind::DateTime.default_value() {
            Value::DateTime(value) => assert_eq!(format_date_time(&value), "0001-01-01T00:00:00"),
            other => panic!("unexpected default {other:?}"),
        }

        for kind in PrimitiveKind::iter() {
            assert_eq!(
                kind.default_value().is_null(),
                !kind.is_value_type(),
                "Unexpected default for {kind}"
            );
        }
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(PrimitiveKind::I4.parse("42").unwrap(), Value::I4(42));
        assert_eq!(PrimitiveKind::I4.parse("-42").unwrap(), Value::I4(-42));
        assert_eq!(PrimitiveKind::U1.parse("255").unwrap(), Value::U1(255));
        assert_eq!(PrimitiveKind::R8.parse("2.5").unwrap(), Value::R8(2.5));

        assert!(matches!(
            PrimitiveKind::U1.parse("256"),
            Err(Error::InvalidFormat { .. })
        ));
        assert!(matches!(
            PrimitiveKind::I4.parse("forty-two"),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_boolean_and_char() {
        assert_eq!(PrimitiveKind::Boolean.parse("True").unwrap(), Value::Boolean(true));
        assert_eq!(PrimitiveKind::Boolean.parse("false").unwrap(), Value::Boolean(false));
        assert!(PrimitiveKind::Boolean.parse("yes").is_err());

        assert_eq!(PrimitiveKind::Char.parse("x").unwrap(), Value::Char('x'));
        assert!(PrimitiveKind::Char.parse("xy").is_err());
        assert!(PrimitiveKind::Char.parse("").is_err());
    }

    #[test]
    fn test_parse_guid() {
        let parsed = PrimitiveKind::Guid
            .parse("01234567-89ab-cdef-0123-456789abcdef")
            .unwrap();
        match parsed {
            Value::Guid(guid) => {
                assert_eq!(guid.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
            }
            other => panic!("unexpected value {other:?}"),
        }
        assert!(PrimitiveKind::Guid.parse("not-a-guid").is_err());
    }

    #[test]
    fn test_parse_date_time() {
        let value = PrimitiveKind::DateTime.parse("2024-02-29T13:45:10.5").unwrap();
        match value {
            Value::DateTime(value) => {
                assert_eq!(format_date_time(&value), "2024-02-29T13:45:10.500")
            }
            other => panic!("unexpected value {other:?}"),
        }

        assert!(PrimitiveKind::DateTime.parse("2024-02-29").is_ok());
        assert!(PrimitiveKind::DateTime.parse("2023-02-29").is_err());

        let offset = PrimitiveKind::DateTimeOffset
            .parse("2024-02-29T13:45:10+02:00")
            .unwrap();
        match offset {
            Value::DateTimeOffset(value) => assert_eq!(value.offset().local_minus_utc(), 7200),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_time_span() {
        let span = parse_time_span("1.02:03:04.5").unwrap();
        assert_eq!(span, TimeDelta::milliseconds(93_784_500));
        assert_eq!(format_time_span(&span), "1.02:03:04.5000000");

        let negative = parse_time_span("-00:00:30").unwrap();
        assert_eq!(negative, TimeDelta::seconds(-30));
        assert_eq!(format_time_span(&negative), "-00:00:30");

        assert_eq!(format_time_span(&TimeDelta::zero()), "00:00:00");

        assert!(parse_time_span("24:00:00").is_none());
        assert!(parse_time_span("00:60:00").is_none());
        assert!(parse_time_span("00:00").is_none());
        assert!(parse_time_span("00:00:00.12345678").is_none());
        assert!(parse_time_span("aa:00:00").is_none());
    }
}
