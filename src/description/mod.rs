//! Generic operation description model.
//!
//! This is the transport-neutral shape of a service operation: an ordered list of messages
//! (slot 0 is the request, slot 1 the response) each carrying an ordered list of parts plus a
//! distinguished return value part. The HTTP layer never copies this state, it projects it (see
//! [`crate::http::ParameterCollection`]), so every record is shared through an `Arc` and
//! guarded by a lock. Another component may edit a description while projections of it exist.
//!
//! # Key Components
//!
//! - [`OperationDescription`]: An operation and its messages
//! - [`MessageDescription`]: A request or response message
//! - [`MessageBody`]: The ordered parts and return value slot of a message
//! - [`MessagePart`]: A single named, typed part
//! - [`OperationBuilder`]: Declarative construction of descriptions
//!
//! # Examples
//!
//! ```rust
//! use httpbind::{description::OperationBuilder, typesystem::WireType};
//!
//! let operation = OperationBuilder::new("Divide")
//!     .parameter("a", WireType::I4)
//!     .out_parameter("remainder", WireType::I4)
//!     .returns(WireType::I4)
//!     .build()?;
//!
//! assert_eq!(operation.message_count(), 2);
//! let request = operation.message(0).unwrap();
//! assert_eq!(request.body.part(0).unwrap().name(), "a");
//! # Ok::<(), httpbind::Error>(())
//! ```

mod builder;

use std::sync::{Arc, RwLock};

pub use builder::{OperationBuilder, ParamFlags};

use crate::{typesystem::WireType, Result};

/// Reference to a `MessagePart`
pub type MessagePartRc = Arc<MessagePart>;
/// Reference to a `MessageDescription`
pub type MessageDescriptionRc = Arc<MessageDescription>;
/// Reference to an `OperationDescription`
pub type OperationDescriptionRc = Arc<OperationDescription>;

/// The slot index of the request message
pub const REQUEST_MESSAGE: usize = 0;
/// The slot index of the response message
pub const RESPONSE_MESSAGE: usize = 1;

/// A single named and typed part of a message
///
/// Identity is the allocation: two parts with equal name and type are still different parts.
#[derive(Debug)]
pub struct MessagePart {
    name: RwLock<String>,
    part_type: RwLock<WireType>,
}

impl MessagePart {
    /// Create a new part
    ///
    /// ## Arguments
    /// * `name`      - The name of the part
    /// * `part_type` - The declared type of the part
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str, part_type: WireType) -> Result<MessagePartRc> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "a message part requires a name"));
        }

        Ok(Arc::new(MessagePart {
            name: RwLock::new(name.to_string()),
            part_type: RwLock::new(part_type),
        }))
    }

    /// The name of this part
    #[must_use]
    pub fn name(&self) -> String {
        read_lock!(self.name).clone()
    }

    /// Rename this part
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn set_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "a message part requires a name"));
        }

        *write_lock!(self.name) = name.to_string();
        Ok(())
    }

    /// The declared type of this part
    #[must_use]
    pub fn part_type(&self) -> WireType {
        read_lock!(self.part_type).clone()
    }

    /// Change the declared type of this part
    pub fn set_part_type(&self, part_type: WireType) {
        *write_lock!(self.part_type) = part_type;
    }

    /// Create an unrelated part with the same name and type
    #[must_use]
    pub fn detached_copy(&self) -> MessagePartRc {
        Arc::new(MessagePart {
            name: RwLock::new(self.name()),
            part_type: RwLock::new(self.part_type()),
        })
    }
}

/// The ordered parts and the return value slot of a message
#[derive(Debug, Default)]
pub struct MessageBody {
    parts: RwLock<Vec<MessagePartRc>>,
    return_value: RwLock<Option<MessagePartRc>>,
}

impl MessageBody {
    /// Number of parts
    #[must_use]
    pub fn len(&self) -> usize {
        read_lock!(self.parts).len()
    }

    /// Check if there are no parts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read_lock!(self.parts).is_empty()
    }

    /// The part at `index`
    #[must_use]
    pub fn part(&self, index: usize) -> Option<MessagePartRc> {
        read_lock!(self.parts).get(index).cloned()
    }

    /// Snapshot of all parts, in order
    #[must_use]
    pub fn parts(&self) -> Vec<MessagePartRc> {
        read_lock!(self.parts).clone()
    }

    /// Append a part
    pub fn push_part(&self, part: MessagePartRc) {
        write_lock!(self.parts).push(part);
    }

    /// Insert a part at `index`, shifting later parts
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index > len`.
    pub fn insert_part(&self, index: usize, part: MessagePartRc) -> Result<()> {
        let mut parts = write_lock!(self.parts);
        if index > parts.len() {
            return Err(out_of_range!("index", index, parts.len()));
        }

        parts.insert(index, part);
        Ok(())
    }

    /// Replace the part at `index`, returning the previous one
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= len`.
    pub fn set_part(&self, index: usize, part: MessagePartRc) -> Result<MessagePartRc> {
        let mut parts = write_lock!(self.parts);
        match parts.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, part)),
            None => Err(out_of_range!("index", index, parts.len())),
        }
    }

    /// Remove the part at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= len`.
    pub fn remove_part(&self, index: usize) -> Result<MessagePartRc> {
        let mut parts = write_lock!(self.parts);
        if index >= parts.len() {
            return Err(out_of_range!("index", index, parts.len()));
        }

        Ok(parts.remove(index))
    }

    /// Remove all parts, the return value slot is left untouched
    pub fn clear_parts(&self) {
        write_lock!(self.parts).clear();
    }

    /// Position of `part`, compared by identity
    #[must_use]
    pub fn index_of_part(&self, part: &MessagePartRc) -> Option<usize> {
        read_lock!(self.parts)
            .iter()
            .position(|candidate| Arc::ptr_eq(candidate, part))
    }

    /// The return value part, if any
    #[must_use]
    pub fn return_value(&self) -> Option<MessagePartRc> {
        read_lock!(self.return_value).clone()
    }

    /// Replace the return value part
    pub fn set_return_value(&self, part: Option<MessagePartRc>) {
        *write_lock!(self.return_value) = part;
    }
}

/// Direction of a message relative to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageDirection {
    /// Sent by the client, the request
    Input,
    /// Sent by the service, the response
    Output,
}

/// A request or response message of an operation
#[derive(Debug)]
pub struct MessageDescription {
    /// The action identifying this message
    pub action: String,
    /// Whether this is the request or the response
    pub direction: MessageDirection,
    /// The parts of this message
    pub body: MessageBody,
}

impl MessageDescription {
    /// Create a new message without parts
    #[must_use]
    pub fn new(action: &str, direction: MessageDirection) -> MessageDescriptionRc {
        Arc::new(MessageDescription {
            action: action.to_string(),
            direction,
            body: MessageBody::default(),
        })
    }
}

/// A service operation and its messages
#[derive(Debug)]
pub struct OperationDescription {
    name: String,
    messages: RwLock<Vec<MessageDescriptionRc>>,
}

impl OperationDescription {
    /// Create a new operation without messages
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str) -> Result<OperationDescriptionRc> {
        if name.is_empty() {
            return Err(invalid_argument!("name", "an operation requires a name"));
        }

        Ok(Arc::new(OperationDescription {
            name: name.to_string(),
            messages: RwLock::new(Vec::new()),
        }))
    }

    /// The name of this operation
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The message in slot `index`
    #[must_use]
    pub fn message(&self, index: usize) -> Option<MessageDescriptionRc> {
        read_lock!(self.messages).get(index).cloned()
    }

    /// Snapshot of all messages, in slot order
    #[must_use]
    pub fn messages(&self) -> Vec<MessageDescriptionRc> {
        read_lock!(self.messages).clone()
    }

    /// Number of messages
    #[must_use]
    pub fn message_count(&self) -> usize {
        read_lock!(self.messages).len()
    }

    /// Append a message
    pub fn add_message(&self, message: MessageDescriptionRc) {
        write_lock!(self.messages).push(message);
    }

    /// Remove the message in slot `index`, later messages move down one slot
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= message_count`.
    pub fn remove_message(&self, index: usize) -> Result<MessageDescriptionRc> {
        let mut messages = write_lock!(self.messages);
        if index >= messages.len() {
            return Err(out_of_range!("index", index, messages.len()));
        }

        Ok(messages.remove(index))
    }

    /// Remove every message
    pub fn clear_messages(&self) {
        write_lock!(self.messages).clear();
    }

    /// An operation with a request but no response message is one-way
    #[must_use]
    pub fn is_one_way(&self) -> bool {
        read_lock!(self.messages).len() == 1
    }

    /// Get the message in slot `index`, creating empty messages for every missing slot up to
    /// and including `index`
    ///
    /// Slot 0 is created as the request, every later slot as a response.
    pub fn ensure_message(&self, index: usize) -> MessageDescriptionRc {
        let mut messages = write_lock!(self.messages);
        while messages.len() <= index {
            let slot = messages.len();
            let (action, direction) = if slot == REQUEST_MESSAGE {
                (self.name.clone(), MessageDirection::Input)
            } else {
                (format!("{}Response", self.name), MessageDirection::Output)
            };

            tracing::debug!(operation = %self.name, slot, "recreating missing message");
            messages.push(MessageDescription::new(&action, direction));
        }

        messages[index].clone()
    }
}
