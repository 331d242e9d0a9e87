use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, OnceLock, Weak,
    },
};

use dashmap::DashMap;

use crate::{
    converter::{ConverterRegistry, ValueConverterRc},
    description::{MessagePart, MessagePartRc},
    typesystem::WireType,
    Result,
};

/// Where a descriptor keeps its name and type
#[derive(Clone)]
enum PartLink {
    /// Free-standing, the descriptor is the only owner of its part
    Owned(MessagePartRc),
    /// Projected from a description, which owns the part
    Backed {
        part: Weak<MessagePart>,
        /// Answers reads and writes once the description dropped the part
        detached: MessagePartRc,
    },
}

/// State shared by every clone of a descriptor, and by every projection of the same part
#[derive(Default)]
struct DescriptorState {
    converter: OnceLock<ValueConverterRc>,
    is_content: AtomicBool,
}

/// Reference to a shared `PartStates`
pub(crate) type PartStatesRc = Arc<PartStates>;

/// Descriptor state of the parts projected by one operation, keyed by part identity
///
/// The state never goes onto the part itself, so two operations derived from the same
/// description keep separate flags and converters. An entry holds a weak handle to its part,
/// which keeps the allocation and therefore the key from being reused while the entry lives.
#[derive(Default)]
pub(crate) struct PartStates {
    states: DashMap<usize, (Weak<MessagePart>, Arc<DescriptorState>)>,
}

impl PartStates {
    /// A descriptor backed by `part`, sharing the state of earlier projections of it
    pub(crate) fn project(&self, part: &MessagePartRc) -> ParameterDescriptor {
        let state = self
            .states
            .entry(part_key(part))
            .or_insert_with(|| (Arc::downgrade(part), Arc::default()))
            .1
            .clone();

        ParameterDescriptor {
            link: PartLink::Backed {
                part: Arc::downgrade(part),
                detached: part.detached_copy(),
            },
            state,
        }
    }

    /// Make `descriptor`'s state the one projections of its part observe
    ///
    /// Called when the part behind `descriptor` is handed to the description. Entries of
    /// dropped parts are pruned on the way.
    pub(crate) fn adopt(&self, descriptor: &ParameterDescriptor) {
        self.states.retain(|_, (part, _)| part.strong_count() > 0);

        let part = descriptor.part();
        self.states
            .insert(part_key(&part), (Arc::downgrade(&part), descriptor.state.clone()));
    }
}

fn part_key(part: &MessagePartRc) -> usize {
    Arc::as_ptr(part) as usize
}

/// A parameter or return value of an HTTP operation
///
/// A descriptor either owns its name and type, or it reads them through a weak handle to a
/// part of an [`crate::description::OperationDescription`], in which case edits made to that
/// part are visible immediately. Clones refer to the same descriptor.
#[derive(Clone)]
pub struct ParameterDescriptor {
    link: PartLink,
    state: Arc<DescriptorState>,
}

impl ParameterDescriptor {
    /// Create a free-standing descriptor
    ///
    /// ## Arguments
    /// * `name`       - The name of the parameter
    /// * `param_type` - The declared type of the parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str, param_type: WireType) -> Result<Self> {
        Ok(ParameterDescriptor {
            link: PartLink::Owned(MessagePart::new(name, param_type)?),
            state: Arc::default(),
        })
    }

    /// The part this descriptor reads through, as long as it is alive
    pub(crate) fn part(&self) -> MessagePartRc {
        match &self.link {
            PartLink::Owned(part) => part.clone(),
            PartLink::Backed { part, detached } => {
                part.upgrade().unwrap_or_else(|| detached.clone())
            }
        }
    }

    /// The backing part, `None` if the description dropped it
    pub(crate) fn live_part(&self) -> Option<MessagePartRc> {
        match &self.link {
            PartLink::Owned(part) => Some(part.clone()),
            PartLink::Backed { part, .. } => part.upgrade(),
        }
    }

    /// The name of this parameter
    #[must_use]
    pub fn name(&self) -> String {
        self.part().name()
    }

    /// Rename this parameter, a backed descriptor renames the part of the description
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `name` is empty.
    pub fn set_name(&self, name: &str) -> Result<()> {
        self.part().set_name(name)
    }

    /// The declared type of this parameter
    #[must_use]
    pub fn parameter_type(&self) -> WireType {
        self.part().part_type()
    }

    /// Change the declared type, a backed descriptor retypes the part of the description
    ///
    /// An already resolved [`ParameterDescriptor::value_converter`] is not affected.
    pub fn set_parameter_type(&self, param_type: WireType) {
        self.part().set_part_type(param_type);
    }

    /// The converter for this parameter
    ///
    /// Resolved from [`ConverterRegistry::global`] on first access for the type observed at
    /// that moment, and kept from then on. Descriptors projected by the same operation from
    /// the same part share the resolved converter.
    pub fn value_converter(&self) -> ValueConverterRc {
        self.state
            .converter
            .get_or_init(|| ConverterRegistry::global().value_converter(&self.parameter_type()))
            .clone()
    }

    /// Check if this parameter supplies the message body
    #[must_use]
    pub fn is_content_parameter(&self) -> bool {
        self.state.is_content.load(Ordering::Relaxed)
    }

    /// Mark this parameter as the one supplying the message body
    pub fn set_content_parameter(&self, is_content: bool) {
        self.state.is_content.store(is_content, Ordering::Relaxed);
    }

    /// Check if this descriptor is backed by a description part
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        matches!(self.link, PartLink::Backed { .. })
    }

    /// Check if both descriptors stand for the same part
    #[must_use]
    pub fn same_part(&self, other: &ParameterDescriptor) -> bool {
        std::ptr::eq(self.part_ptr(), other.part_ptr())
    }

    fn part_ptr(&self) -> *const MessagePart {
        match &self.link {
            PartLink::Owned(part) => Arc::as_ptr(part),
            PartLink::Backed { part, .. } => part.as_ptr(),
        }
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name())
            .field("parameter_type", &self.parameter_type().to_string())
            .field("is_content_parameter", &self.is_content_parameter())
            .field("is_synchronized", &self.is_synchronized())
            .finish()
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.parameter_type(), self.name())
    }
}
