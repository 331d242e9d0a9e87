//! Declarative construction of operation descriptions.
//!
//! Without reflection, an operation's contract is spelled out through an [`OperationBuilder`]:
//! every parameter is declared with its name, type and direction, and [`OperationBuilder::build`]
//! lays them out into request and response messages.

use std::collections::HashSet;

use bitflags::bitflags;

use crate::{
    description::{
        MessageDescription, MessageDirection, MessagePart, OperationDescription,
        OperationDescriptionRc,
    },
    typesystem::WireType,
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Direction flags of a declared parameter
    pub struct ParamFlags: u8 {
        /// The parameter is sent with the request
        const IN = 0x01;
        /// The parameter is sent back with the response
        const OUT = 0x02;
    }
}

#[derive(Debug, Clone)]
struct DeclaredParameter {
    name: String,
    param_type: WireType,
    flags: ParamFlags,
}

/// Builder for [`OperationDescription`]s
///
/// The request message receives every `IN` parameter, the response message every `OUT`
/// parameter plus the return value part named `<Operation>Result`. One-way operations have no
/// response message.
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    name: String,
    action: Option<String>,
    parameters: Vec<DeclaredParameter>,
    return_type: Option<WireType>,
    one_way: bool,
}

impl OperationBuilder {
    /// Start declaring operation `name`
    #[must_use]
    pub fn new(name: &str) -> Self {
        OperationBuilder {
            name: name.to_string(),
            action: None,
            parameters: Vec::new(),
            return_type: None,
            one_way: false,
        }
    }

    /// Set the request action, defaults to the operation name
    #[must_use]
    pub fn action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    /// Declare an input parameter
    #[must_use]
    pub fn parameter(self, name: &str, param_type: WireType) -> Self {
        self.parameter_with_flags(name, param_type, ParamFlags::IN)
    }

    /// Declare an output-only parameter
    #[must_use]
    pub fn out_parameter(self, name: &str, param_type: WireType) -> Self {
        self.parameter_with_flags(name, param_type, ParamFlags::OUT)
    }

    /// Declare a parameter that is both sent and returned
    #[must_use]
    pub fn ref_parameter(self, name: &str, param_type: WireType) -> Self {
        self.parameter_with_flags(name, param_type, ParamFlags::IN | ParamFlags::OUT)
    }

    /// Declare a parameter with explicit direction flags
    #[must_use]
    pub fn parameter_with_flags(
        mut self,
        name: &str,
        param_type: WireType,
        flags: ParamFlags,
    ) -> Self {
        self.parameters.push(DeclaredParameter {
            name: name.to_string(),
            param_type,
            flags,
        });
        self
    }

    /// Declare the return type, `System.Void` declares no return value
    #[must_use]
    pub fn returns(mut self, return_type: WireType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Declare the operation as one-way, it will have no response message
    #[must_use]
    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Build the description
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the operation or a parameter name is empty,
    /// a parameter name is declared twice, a parameter has no direction, or a one-way
    /// operation declares a return value or output parameters.
    pub fn build(self) -> Result<OperationDescriptionRc> {
        let operation = OperationDescription::new(&self.name)?;
        self.validate()?;

        let action = self.action.clone().unwrap_or_else(|| self.name.clone());
        let request = MessageDescription::new(&action, MessageDirection::Input);
        for declared in self.declared(ParamFlags::IN) {
            request
                .body
                .push_part(MessagePart::new(&declared.name, declared.param_type.clone())?);
        }
        operation.add_message(request);

        if !self.one_way {
            let response =
                MessageDescription::new(&format!("{action}Response"), MessageDirection::Output);
            for declared in self.declared(ParamFlags::OUT) {
                response
                    .body
                    .push_part(MessagePart::new(&declared.name, declared.param_type.clone())?);
            }
            if let Some(return_type) = self
                .return_type
                .as_ref()
                .filter(|ty| **ty != WireType::Void)
            {
                response.body.set_return_value(Some(MessagePart::new(
                    &format!("{}Result", self.name),
                    return_type.clone(),
                )?));
            }
            operation.add_message(response);
        }

        tracing::debug!(
            operation = %self.name,
            parameters = self.parameters.len(),
            one_way = self.one_way,
            "built operation description"
        );
        Ok(operation)
    }

    fn declared(&self, flags: ParamFlags) -> impl Iterator<Item = &DeclaredParameter> {
        self.parameters
            .iter()
            .filter(move |declared| declared.flags.contains(flags))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for declared in &self.parameters {
            if declared.name.is_empty() {
                return Err(invalid_argument!(
                    "name",
                    "parameter of operation '{}' has no name",
                    self.name
                ));
            }
            if !seen.insert(declared.name.as_str()) {
                return Err(invalid_argument!(
                    "name",
                    "parameter '{}' is declared twice on operation '{}'",
                    declared.name,
                    self.name
                ));
            }
            if declared.flags.is_empty() {
                return Err(invalid_argument!(
                    "flags",
                    "parameter '{}' has no direction",
                    declared.name
                ));
            }
        }

        if self.one_way {
            if self
                .return_type
                .as_ref()
                .is_some_and(|ty| *ty != WireType::Void)
            {
                return Err(invalid_argument!(
                    "return_type",
                    "one-way operation '{}' cannot return a value",
                    self.name
                ));
            }
            if self.declared(ParamFlags::OUT).next().is_some() {
                return Err(invalid_argument!(
                    "flags",
                    "one-way operation '{}' cannot have output parameters",
                    self.name
                ));
            }
        }

        Ok(())
    }
}
