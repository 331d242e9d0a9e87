//! Integration tests for operation descriptors derived from descriptions.
//!
//! This module walks through the life of an operation the way a dispatcher sees it: derive
//! the HTTP view from a description, bind arguments, and keep working while another component
//! edits the description underneath.

use httpbind::{prelude::*, Result};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// string Calculate(int a, out double b)
fn calculate() -> Result<OperationDescriptionRc> {
    OperationBuilder::new("Calculate")
        .parameter("a", WireType::I4)
        .out_parameter("b", WireType::R8)
        .returns(WireType::STRING)
        .build()
}

#[test]
fn test_calculate_shape() -> Result<()> {
    let operation = OperationDescriptor::from_description(calculate()?);

    let inputs = operation.input_parameters();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs.get(0)?.parameter_type(), WireType::I4);
    assert_eq!(inputs.get(0)?.name(), "a");

    let outputs = operation.output_parameters();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs.get(0)?.parameter_type(), WireType::R8);

    let return_value = operation.return_value().expect("operation returns a string");
    assert_eq!(return_value.parameter_type(), WireType::STRING);
    assert_eq!(return_value.name(), "CalculateResult");

    Ok(())
}

#[test]
fn test_external_type_change_is_visible() -> Result<()> {
    let description = calculate()?;
    let operation = OperationDescriptor::from_description(description.clone());
    let a = operation.input_parameters().get(0)?;

    let request = description.message(0).expect("request message");
    request
        .body
        .part(0)
        .expect("parameter a")
        .set_part_type(WireType::I8);

    assert_eq!(a.parameter_type(), WireType::I8);
    assert_eq!(
        operation.input_parameters().get(0)?.parameter_type(),
        WireType::I8
    );

    Ok(())
}

#[test]
fn test_cleared_messages_vivify_on_add() -> Result<()> {
    init_tracing();
    let description = calculate()?;
    let mut operation = OperationDescriptor::from_description(description.clone());

    description.clear_messages();
    assert_eq!(operation.input_parameters().len(), 0);
    assert_eq!(operation.output_parameters().len(), 0);
    assert!(operation.return_value().is_none());
    assert!(matches!(
        operation.input_parameters().get(0),
        Err(Error::OutOfRange { param: "index", .. })
    ));

    operation.input_parameters_mut().clear();
    assert_eq!(description.message_count(), 0);

    operation
        .output_parameters_mut()
        .add(ParameterDescriptor::new("b", WireType::R8)?);
    assert_eq!(description.message_count(), 2);
    assert_eq!(operation.output_parameters().len(), 1);
    assert_eq!(operation.input_parameters().len(), 0);

    operation
        .input_parameters_mut()
        .add(ParameterDescriptor::new("a", WireType::I4)?);
    assert_eq!(operation.input_parameters().get(0)?.name(), "a");

    Ok(())
}

#[test]
fn test_return_value_vivifies_response() -> Result<()> {
    let description = OperationBuilder::new("Notify").one_way().build()?;
    let mut operation = OperationDescriptor::from_description(description.clone());
    assert!(description.is_one_way());
    assert!(operation.return_value().is_none());

    operation.set_return_value(Some(ParameterDescriptor::new("ack", WireType::BOOLEAN)?));
    assert!(!description.is_one_way());
    assert_eq!(
        operation.return_value().expect("return value").parameter_type(),
        WireType::BOOLEAN
    );

    Ok(())
}

#[test]
fn test_content_flag_is_kept_by_operation() -> Result<()> {
    let description = OperationBuilder::new("Upload")
        .parameter("body", WireType::STRING)
        .build()?;
    let operation = OperationDescriptor::from_description(description);

    operation.input_parameters().get(0)?.set_content_parameter(true);
    assert!(operation.input_parameters().get(0)?.is_content_parameter());
    assert_eq!(operation.content_parameter().expect("content").name(), "body");

    Ok(())
}

#[test]
fn test_converter_stays_pinned_across_reads() -> Result<()> {
    let description = OperationBuilder::new("Get")
        .parameter("id", WireType::I4)
        .build()?;
    let operation = OperationDescriptor::from_description(description.clone());

    let first = operation.input_parameters().get(0)?.value_converter();
    description
        .message(0)
        .expect("request message")
        .body
        .part(0)
        .expect("parameter id")
        .set_part_type(WireType::STRING);

    let id = operation.input_parameters().get(0)?;
    assert_eq!(id.parameter_type(), WireType::STRING);
    assert!(Arc::ptr_eq(&first, &id.value_converter()));
    assert_eq!(operation.bind_arguments(vec![Value::from("7")])?, vec![Value::I4(7)]);

    // a fresh derivation resolves against the current type
    let fresh = OperationDescriptor::from_description(description);
    assert_eq!(
        fresh.input_parameters().get(0)?.value_converter().wire_type(),
        &WireType::STRING
    );

    Ok(())
}

#[test]
fn test_remove_sole_input() -> Result<()> {
    let description = OperationBuilder::new("Get")
        .parameter("id", WireType::GUID)
        .build()?;
    let mut operation = OperationDescriptor::from_description(description);

    operation.input_parameters_mut().remove_at(0)?;
    assert_eq!(operation.input_parameters().len(), 0);
    assert!(matches!(
        operation.input_parameters_mut().remove_at(0),
        Err(Error::OutOfRange { param: "index", index: 0, len: 0 })
    ));

    Ok(())
}

#[test]
fn test_bind_request_and_response() -> Result<()> {
    let color = WireType::enumeration(
        EnumType::new("MyApp", "Color")?
            .member("Red", 1)
            .member("Green", 2),
    );
    let description = OperationBuilder::new("Paint")
        .parameter("color", color.clone())
        .parameter("count", WireType::nullable(WireType::I4)?)
        .parameter("when", WireType::DATE_TIME)
        .returns(WireType::envelope(EnvelopeKind::Content, WireType::STRING))
        .build()?;
    let operation = OperationDescriptor::from_description(description);

    let bound = operation.bind_arguments(vec![
        Value::from("Green"),
        Value::from(""),
        Value::from("2024-02-29T12:30:00"),
    ])?;
    assert_eq!(bound[0].as_i64(), Some(2));
    assert_eq!(bound[1], Value::Null);
    assert!(matches!(bound[2], Value::DateTime(_)));

    let result = operation.bind_result(Value::from("painted"))?;
    let envelope = result.as_envelope().expect("content wrapper");
    assert_eq!(envelope.kind, EnvelopeKind::Content);
    assert_eq!(envelope.payload, Value::from("painted"));

    Ok(())
}

#[test]
fn test_free_standing_round_trip() -> Result<()> {
    let mut operation = OperationDescriptor::new("Upload")?;
    let body = ParameterDescriptor::new("body", WireType::RawContent)?;
    body.set_content_parameter(true);
    operation
        .input_parameters_mut()
        .add(ParameterDescriptor::new("name", WireType::STRING)?);
    operation.input_parameters_mut().add(body.clone());
    operation.set_return_value(Some(ParameterDescriptor::new("id", WireType::GUID)?));
    assert!(operation.add_known_type(WireType::class("MyApp", "Receipt")?));

    assert!(operation.content_parameter().expect("content").same_part(&body));

    let derived = OperationDescriptor::from_description(operation.to_description()?);
    let names: Vec<String> = derived
        .input_parameters()
        .iter()
        .map(|parameter| parameter.name())
        .collect();
    assert_eq!(names, ["name", "body"]);
    assert_eq!(
        derived.return_value().expect("return value").parameter_type(),
        WireType::GUID
    );

    // content flags are kept by the operation, not written into the description
    assert!(derived.content_parameter().is_none());

    Ok(())
}

#[test]
fn test_views_share_the_description() -> Result<()> {
    let description = calculate()?;
    let mut first = OperationDescriptor::from_description(description.clone());
    let second = OperationDescriptor::from_description(description.clone());

    first
        .input_parameters_mut()
        .add(ParameterDescriptor::new("c", WireType::STRING)?);
    assert_eq!(second.input_parameters().len(), 2);
    assert!(Arc::ptr_eq(
        first.description().expect("derived"),
        second.description().expect("derived")
    ));

    Ok(())
}
