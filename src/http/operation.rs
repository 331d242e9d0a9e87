use std::{fmt, sync::Arc};

use crate::{
    description::{
        MessageDescription, MessageDirection, OperationDescription, OperationDescriptionRc,
        REQUEST_MESSAGE, RESPONSE_MESSAGE,
    },
    http::{
        parameter::{PartStates, PartStatesRc},
        ParameterCollection, ParameterDescriptor,
    },
    typesystem::{Value, WireType},
    Result,
};

/// Reference to a shared `OperationBehavior`
pub type OperationBehaviorRc = Arc<dyn OperationBehavior>;

/// An extension attached to an operation
///
/// Behaviors get a chance to reject an operation shape they cannot serve, e.g. a formatter
/// requiring a single content parameter.
pub trait OperationBehavior: Send + Sync + fmt::Debug {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Check that `operation` is acceptable for this behavior
    ///
    /// # Errors
    /// Returns an error describing why `operation` cannot be served.
    fn validate(&self, _operation: &OperationDescriptor) -> Result<()> {
        Ok(())
    }
}

/// A named attribute attached to an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationAttribute {
    /// The name of the attribute, e.g. `WebGet`
    pub name: String,
    /// Named arguments of the attribute, in declaration order
    pub arguments: Vec<(String, String)>,
}

impl OperationAttribute {
    /// Create an attribute without arguments
    #[must_use]
    pub fn new(name: &str) -> Self {
        OperationAttribute {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    /// Add a named argument
    #[must_use]
    pub fn with_argument(mut self, name: &str, value: &str) -> Self {
        self.arguments.push((name.to_string(), value.to_string()));
        self
    }

    /// Look up a named argument
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(argument, _)| argument == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP operation: its return value, its input and output parameters, and the auxiliary
/// data a dispatcher needs
///
/// Derived from an [`OperationDescription`], the parameter collections and the return value
/// are projections of the request and response messages. Changes made to the description
/// afterwards are visible without deriving again, and edits made through the descriptor
/// reach the description.
///
/// Content flags and resolved converters of a derived operation are kept by the operation,
/// keyed by the identity of the parts they describe. Every read of a part through the same
/// operation observes them, other operations derived from the same description do not.
pub struct OperationDescriptor {
    name: String,
    description: Option<OperationDescriptionRc>,
    part_states: PartStatesRc,
    return_value: Option<ParameterDescriptor>,
    input_parameters: ParameterCollection,
    output_parameters: ParameterCollection,
    /// Attributes of the operation, in declaration order
    pub attributes: Vec<OperationAttribute>,
    known_types: Vec<WireType>,
    /// Behaviors attached to the operation
    pub behaviors: Vec<OperationBehaviorRc>,
}

impl OperationDescriptor {
    /// Create an empty, free-standing operation
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "an operation requires a name"));
        }

        Ok(OperationDescriptor {
            name: name.to_string(),
            description: None,
            part_states: PartStatesRc::default(),
            return_value: None,
            input_parameters: ParameterCollection::new(),
            output_parameters: ParameterCollection::new(),
            attributes: Vec::new(),
            known_types: Vec::new(),
            behaviors: Vec::new(),
        })
    }

    /// Derive an operation projecting `description`
    ///
    /// Inputs project the request message (slot 0), outputs and the return value project the
    /// response message (slot 1).
    #[must_use]
    pub fn from_description(description: OperationDescriptionRc) -> Self {
        tracing::debug!(
            operation = description.name(),
            messages = description.message_count(),
            "deriving operation descriptor"
        );

        let part_states = Arc::new(PartStates::default());
        OperationDescriptor {
            name: description.name().to_string(),
            return_value: None,
            input_parameters: ParameterCollection::synchronized_with(
                description.clone(),
                REQUEST_MESSAGE,
                part_states.clone(),
            ),
            output_parameters: ParameterCollection::synchronized_with(
                description.clone(),
                RESPONSE_MESSAGE,
                part_states.clone(),
            ),
            description: Some(description),
            part_states,
            attributes: Vec::new(),
            known_types: Vec::new(),
            behaviors: Vec::new(),
        }
    }

    /// The name of this operation
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description this operation projects, if any
    #[must_use]
    pub fn description(&self) -> Option<&OperationDescriptionRc> {
        self.description.as_ref()
    }

    /// The return value, `None` for operations returning nothing
    #[must_use]
    pub fn return_value(&self) -> Option<ParameterDescriptor> {
        match &self.description {
            Some(description) => description
                .message(RESPONSE_MESSAGE)
                .and_then(|message| message.body.return_value())
                .map(|part| self.part_states.project(&part)),
            None => self.return_value.clone(),
        }
    }

    /// Replace the return value
    ///
    /// Setting a return value on a derived operation recreates a missing response message.
    pub fn set_return_value(&mut self, return_value: Option<ParameterDescriptor>) {
        let Some(description) = &self.description else {
            self.return_value = return_value;
            return;
        };

        match return_value {
            Some(descriptor) => {
                description
                    .ensure_message(RESPONSE_MESSAGE)
                    .body
                    .set_return_value(Some(descriptor.part()));
                self.part_states.adopt(&descriptor);
            }
            None => {
                if let Some(message) = description.message(RESPONSE_MESSAGE) {
                    message.body.set_return_value(None);
                }
            }
        }
    }

    /// The parameters sent with the request
    #[must_use]
    pub fn input_parameters(&self) -> &ParameterCollection {
        &self.input_parameters
    }

    /// Mutable access to the parameters sent with the request
    pub fn input_parameters_mut(&mut self) -> &mut ParameterCollection {
        &mut self.input_parameters
    }

    /// The parameters sent back with the response
    #[must_use]
    pub fn output_parameters(&self) -> &ParameterCollection {
        &self.output_parameters
    }

    /// Mutable access to the parameters sent back with the response
    pub fn output_parameters_mut(&mut self) -> &mut ParameterCollection {
        &mut self.output_parameters
    }

    /// Types a serializer has to know in addition to the declared ones
    #[must_use]
    pub fn known_types(&self) -> &[WireType] {
        &self.known_types
    }

    /// Register a known type, returns `false` if it was already registered
    pub fn add_known_type(&mut self, known_type: WireType) -> bool {
        if self.known_types.contains(&known_type) {
            return false;
        }

        self.known_types.push(known_type);
        true
    }

    /// Attach a behavior
    pub fn add_behavior(&mut self, behavior: OperationBehaviorRc) {
        self.behaviors.push(behavior);
    }

    /// Run [`OperationBehavior::validate`] of every attached behavior, in order
    ///
    /// # Errors
    /// Returns the error of the first behavior rejecting this operation.
    pub fn validate(&self) -> Result<()> {
        for behavior in &self.behaviors {
            behavior.validate(self)?;
        }
        Ok(())
    }

    /// The first input parameter marked as content
    #[must_use]
    pub fn content_parameter(&self) -> Option<ParameterDescriptor> {
        self.input_parameters
            .iter()
            .find(ParameterDescriptor::is_content_parameter)
    }

    /// Convert wire values into call arguments, one per input parameter
    ///
    /// ## Arguments
    /// * `arguments` - The wire values, in input parameter order
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the number of values does not match the
    /// number of input parameters, or the conversion error of the first value that cannot be
    /// converted.
    pub fn bind_arguments(&self, arguments: Vec<Value>) -> Result<Vec<Value>> {
        let parameters = self.input_parameters.to_vec();
        if parameters.len() != arguments.len() {
            return Err(invalid_argument!(
                "arguments",
                "operation '{}' takes {} arguments, {} were given",
                self.name,
                parameters.len(),
                arguments.len()
            ));
        }

        parameters
            .iter()
            .zip(arguments)
            .map(|(parameter, argument)| parameter.value_converter().convert(argument))
            .collect()
    }

    /// Convert a call result into the wire value of the return value
    ///
    /// # Errors
    /// Returns the conversion error if `result` cannot be converted.
    pub fn bind_result(&self, result: Value) -> Result<Value> {
        match self.return_value() {
            Some(return_value) => return_value.value_converter().convert(result),
            None => Ok(Value::Null),
        }
    }

    /// The description of this operation
    ///
    /// A derived operation returns the description it projects. A free-standing operation is
    /// materialized into a new description with copies of its parameters.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the operation name is empty.
    pub fn to_description(&self) -> Result<OperationDescriptionRc> {
        if let Some(description) = &self.description {
            return Ok(description.clone());
        }

        let description = OperationDescription::new(&self.name)?;
        let request = MessageDescription::new(&self.name, MessageDirection::Input);
        for parameter in &self.input_parameters {
            request.body.push_part(parameter.part().detached_copy());
        }
        description.add_message(request);

        let return_value = self.return_value();
        if return_value.is_some() || !self.output_parameters.is_empty() {
            let response = MessageDescription::new(
                &format!("{}Response", self.name),
                MessageDirection::Output,
            );
            for parameter in &self.output_parameters {
                response.body.push_part(parameter.part().detached_copy());
            }
            response
                .body
                .set_return_value(return_value.map(|value| value.part().detached_copy()));
            description.add_message(response);
        }

        Ok(description)
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("synchronized", &self.description.is_some())
            .field("return_value", &self.return_value())
            .field("input_parameters", &self.input_parameters)
            .field("output_parameters", &self.output_parameters)
            .field("attributes", &self.attributes)
            .field("known_types", &self.known_types)
            .field("behaviors", &self.behaviors)
            .finish()
    }
}
