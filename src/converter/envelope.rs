use crate::{
    converter::{mismatch, BindingConfig, ValueConverter},
    typesystem::{Envelope, EnvelopeKind, Value, WireType},
    Result,
};

/// Converter for `ObjectContent<T>`
///
/// Wraps bare payloads in the configured default format and rewraps the payload of request and
/// response envelopes, keeping their format. Strings are only accepted as payload when `T` is
/// `System.String` itself.
#[derive(Debug)]
pub struct ContentConverter {
    wire_type: WireType,
    payload_type: WireType,
    config: BindingConfig,
}

impl ContentConverter {
    /// Create a new converter bound to `wire_type`, returns `None` if it is not a content
    /// envelope type
    #[must_use]
    pub fn new(wire_type: WireType, config: BindingConfig) -> Option<Self> {
        let payload_type = match wire_type.as_envelope() {
            Some((EnvelopeKind::Content, payload)) => payload.clone(),
            _ => return None,
        };

        Some(ContentConverter {
            wire_type,
            payload_type,
            config,
        })
    }

    fn carries(&self, payload: &WireType) -> bool {
        payload.underlying_type() == self.payload_type.underlying_type()
    }
}

impl ValueConverter for ContentConverter {
    fn wire_type(&self) -> &WireType {
        &self.wire_type
    }

    fn payload_type(&self) -> &WireType {
        &self.payload_type
    }

    fn can_convert_from_string(&self) -> bool {
        false
    }

    fn can_convert_from_type(&self, candidate: &WireType) -> bool {
        match candidate.as_envelope() {
            Some((_, payload)) => self.carries(payload),
            None => self.carries(candidate),
        }
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Envelope(envelope) if self.carries(&envelope.payload_type) => {
                if envelope.kind == EnvelopeKind::Content
                    && envelope.payload_type == self.payload_type
                {
                    return Ok(Value::Envelope(envelope));
                }

                let format = envelope.format;
                let rewrapped = Envelope::new(
                    EnvelopeKind::Content,
                    self.payload_type.clone(),
                    envelope.payload,
                    format,
                )?;
                Ok(Value::from(rewrapped))
            }
            Value::String(_) if self.payload_type != WireType::STRING => {
                Err(mismatch(&value, &self.wire_type))
            }
            payload if self.payload_type.is_instance(&payload) => {
                let wrapped = Envelope::new(
                    EnvelopeKind::Content,
                    self.payload_type.clone(),
                    payload,
                    self.config.default_format,
                )?;
                Ok(Value::from(wrapped))
            }
            other => Err(mismatch(&other, &self.wire_type)),
        }
    }
}

/// Converter for `HttpRequestMessage<T>` and `HttpResponseMessage<T>`
///
/// A message is never built implicitly: only a message of exactly the bound type passes, and
/// null stays null.
#[derive(Debug)]
pub struct MessageConverter {
    kind: EnvelopeKind,
    wire_type: WireType,
    payload_type: WireType,
}

impl MessageConverter {
    /// Create a new converter bound to `wire_type`, returns `None` if it is not a request or
    /// response envelope type
    #[must_use]
    pub fn new(wire_type: WireType) -> Option<Self> {
        let (kind, payload_type) = match wire_type.as_envelope() {
            Some((kind @ (EnvelopeKind::Request | EnvelopeKind::Response), payload)) => {
                (kind, payload.clone())
            }
            _ => return None,
        };

        Some(MessageConverter {
            kind,
            wire_type,
            payload_type,
        })
    }

    /// The message shape this converter is bound to
    #[must_use]
    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }
}

impl ValueConverter for MessageConverter {
    fn wire_type(&self) -> &WireType {
        &self.wire_type
    }

    fn payload_type(&self) -> &WireType {
        &self.payload_type
    }

    fn can_convert_from_string(&self) -> bool {
        false
    }

    fn can_convert_from_type(&self, candidate: &WireType) -> bool {
        *candidate == self.wire_type
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Envelope(envelope)
                if envelope.kind == self.kind && envelope.payload_type == self.payload_type =>
            {
                Ok(Value::Envelope(envelope))
            }
            other => Err(mismatch(&other, &self.wire_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        typesystem::{ContentFormat, ObjectValue},
        Error,
    };

    fn customer() -> WireType {
        WireType::class("MyApp", "Customer").unwrap()
    }

    fn ada() -> Value {
        match customer() {
            WireType::Class(class_type) => {
                Value::from(ObjectValue::new(class_type).with_field("Name", Value::from("Ada")))
            }
            _ => unreachable!(),
        }
    }

    fn content_converter(payload: WireType) -> ContentConverter {
        ContentConverter::new(
            WireType::envelope(EnvelopeKind::Content, payload),
            BindingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_constructors_check_shape() {
        assert!(ContentConverter::new(WireType::I4, BindingConfig::default()).is_none());
        assert!(ContentConverter::new(
            WireType::envelope(EnvelopeKind::Request, WireType::I4),
            BindingConfig::default()
        )
        .is_none());
        assert!(MessageConverter::new(WireType::envelope(EnvelopeKind::Content, WireType::I4))
            .is_none());

        let response = MessageConverter::new(WireType::envelope(EnvelopeKind::Response, customer()))
            .unwrap();
        assert_eq!(response.kind(), EnvelopeKind::Response);
        assert_eq!(response.payload_type(), &customer());
    }

    #[test]
    fn test_content_accepts_payload_type() {
        let converter = content_converter(customer());
        assert_eq!(
            converter.wire_type(),
            &WireType::envelope(EnvelopeKind::Content, customer())
        );
        assert_eq!(converter.payload_type(), &customer());
        assert!(!converter.can_convert_from_string());
        assert!(converter.can_convert_from_type(&customer()));
        assert!(
            converter.can_convert_from_type(&WireType::envelope(EnvelopeKind::Request, customer()))
        );
        assert!(!converter.can_convert_from_type(&WireType::STRING));
        assert!(!converter
            .can_convert_from_type(&WireType::envelope(EnvelopeKind::Content, WireType::I4)));
    }

    #[test]
    fn test_content_wraps_payload() {
        let converter = content_converter(customer());
        let wrapped = converter.convert(ada()).unwrap();
        let envelope = wrapped.as_envelope().unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::Content);
        assert_eq!(envelope.payload, ada());
        assert_eq!(envelope.format, ContentFormat::Xml);

        assert_eq!(converter.convert(wrapped.clone()).unwrap(), wrapped);
        assert_eq!(converter.convert(Value::Null).unwrap(), Value::Null);

        let json = ContentConverter::new(
            WireType::envelope(EnvelopeKind::Content, customer()),
            BindingConfig::lenient(),
        )
        .unwrap();
        assert_eq!(
            json.convert(ada()).unwrap().as_envelope().unwrap().format,
            ContentFormat::Json
        );
    }

    #[test]
    fn test_content_rewraps_messages() {
        let converter = content_converter(customer());
        let request = Envelope::new(
            EnvelopeKind::Request,
            customer(),
            ada(),
            ContentFormat::Json,
        )
        .unwrap();

        let rewrapped = converter.convert(Value::from(request)).unwrap();
        let envelope = rewrapped.as_envelope().unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::Content);
        assert_eq!(envelope.format, ContentFormat::Json);
        assert_eq!(envelope.payload, ada());
    }

    #[test]
    fn test_content_rejects_strings_and_other_payloads() {
        let converter = content_converter(customer());
        match converter.convert(Value::from("Ada")) {
            Err(Error::ConversionMismatch { from, to }) => {
                assert_eq!(from, "System.String");
                assert_eq!(to, "System.Net.Http.ObjectContent`1[MyApp.Customer]");
            }
            other => panic!("unexpected result {other:?}"),
        }

        let other = Envelope::response(WireType::I4, Value::I4(1)).unwrap();
        assert!(matches!(
            converter.convert(Value::from(other)),
            Err(Error::ConversionMismatch { .. })
        ));

        let strings = content_converter(WireType::STRING);
        let wrapped = strings.convert(Value::from("hello")).unwrap();
        assert_eq!(wrapped.as_envelope().unwrap().payload, Value::from("hello"));
    }

    #[test]
    fn test_message_identity_only() {
        let response_type = WireType::envelope(EnvelopeKind::Response, customer());
        let converter = MessageConverter::new(response_type.clone()).unwrap();

        assert!(!converter.can_convert_from_string());
        assert!(converter.can_convert_from_type(&response_type));
        assert!(!converter.can_convert_from_type(&customer()));
        assert!(!converter
            .can_convert_from_type(&WireType::envelope(EnvelopeKind::Request, customer())));

        let response = Value::from(Envelope::response(customer(), ada()).unwrap());
        assert_eq!(converter.convert(response.clone()).unwrap(), response);
        assert_eq!(converter.convert(Value::Null).unwrap(), Value::Null);
        assert!(matches!(
            converter.convert(ada()),
            Err(Error::ConversionMismatch { .. })
        ));
        assert!(matches!(
            converter.convert(Value::from(Envelope::request(customer(), ada()).unwrap())),
            Err(Error::ConversionMismatch { .. })
        ));
    }

    #[test]
    fn test_message_rejects_strings() {
        let converter =
            MessageConverter::new(WireType::envelope(EnvelopeKind::Request, WireType::STRING))
                .unwrap();
        assert!(converter.convert_from_string("x").is_err());
        assert!(matches!(
            converter.convert(Value::from("x")),
            Err(Error::ConversionMismatch { .. })
        ));
    }
}
