use std::{fmt, sync::Arc};

use crate::{
    description::{MessageDescriptionRc, OperationDescriptionRc},
    http::{
        parameter::{PartStates, PartStatesRc},
        ParameterDescriptor,
    },
    Result,
};

/// Where the elements of a collection live
#[derive(Clone)]
enum Backing {
    /// An independent list
    Owned(Vec<ParameterDescriptor>),
    /// The parts of message slot `message` of `operation`
    Synchronized {
        operation: OperationDescriptionRc,
        message: usize,
        states: PartStatesRc,
    },
}

/// An ordered, mutable collection of [`ParameterDescriptor`]s
///
/// A synchronized collection is a projection: it holds no elements of its own, every read
/// derives descriptors from the current parts of its message, and every write goes to that
/// message. If the message does not exist the collection reads as empty, and the first
/// [`ParameterCollection::add`] or [`ParameterCollection::insert`] recreates it.
///
/// Descriptors read from a synchronized collection share their content flag and converter
/// with every other read of the same part through this collection and its clones.
#[derive(Clone)]
pub struct ParameterCollection {
    backing: Backing,
}

impl ParameterCollection {
    /// Create an empty, free-standing collection
    #[must_use]
    pub fn new() -> Self {
        ParameterCollection {
            backing: Backing::Owned(Vec::new()),
        }
    }

    /// Create a collection projecting the parts of message slot `message` of `operation`
    #[must_use]
    pub fn synchronized(operation: OperationDescriptionRc, message: usize) -> Self {
        Self::synchronized_with(operation, message, Arc::new(PartStates::default()))
    }

    /// Create a projection sharing descriptor state with other views of the same operation
    pub(crate) fn synchronized_with(
        operation: OperationDescriptionRc,
        message: usize,
        states: PartStatesRc,
    ) -> Self {
        ParameterCollection {
            backing: Backing::Synchronized {
                operation,
                message,
                states,
            },
        }
    }

    /// Check if this collection projects a description
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        matches!(self.backing, Backing::Synchronized { .. })
    }

    /// Always `false`, both kinds of collection are mutable
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        false
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.backing {
            Backing::Owned(items) => items.len(),
            Backing::Synchronized { .. } => self.message().map_or(0, |message| message.body.len()),
        }
    }

    /// Check if there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parameter at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<ParameterDescriptor> {
        let found = match &self.backing {
            Backing::Owned(items) => items.get(index).cloned(),
            Backing::Synchronized { states, .. } => self
                .message()
                .and_then(|message| message.body.part(index))
                .map(|part| states.project(&part)),
        };

        found.ok_or_else(|| out_of_range!("index", index, self.len()))
    }

    /// Replace the parameter at `index`
    ///
    /// A synchronized collection replaces the part of its message with the part behind
    /// `descriptor`, so the description and `descriptor` share it afterwards.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= len`.
    pub fn set(&mut self, index: usize, descriptor: ParameterDescriptor) -> Result<()> {
        let len = self.len();
        if let Backing::Owned(items) = &mut self.backing {
            return match items.get_mut(index) {
                Some(slot) => {
                    *slot = descriptor;
                    Ok(())
                }
                None => Err(out_of_range!("index", index, len)),
            };
        }

        match self.message() {
            Some(message) => {
                message.body.set_part(index, descriptor.part())?;
                self.adopt(&descriptor);
                Ok(())
            }
            None => Err(out_of_range!("index", index, len)),
        }
    }

    /// Append a parameter, recreating a missing message first
    pub fn add(&mut self, descriptor: ParameterDescriptor) {
        if let Backing::Owned(items) = &mut self.backing {
            items.push(descriptor);
            return;
        }

        self.vivify().body.push_part(descriptor.part());
        self.adopt(&descriptor);
    }

    /// Insert a parameter at `index`, recreating a missing message first
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index > len`. Nothing is recreated then.
    pub fn insert(&mut self, index: usize, descriptor: ParameterDescriptor) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(out_of_range!("index", index, len));
        }

        if let Backing::Owned(items) = &mut self.backing {
            items.insert(index, descriptor);
            return Ok(());
        }

        self.vivify().body.insert_part(index, descriptor.part())?;
        self.adopt(&descriptor);
        Ok(())
    }

    /// Remove `descriptor`, returns `false` if it is not part of this collection
    pub fn remove(&mut self, descriptor: &ParameterDescriptor) -> bool {
        match self.index_of(descriptor) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Remove and return the parameter at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<ParameterDescriptor> {
        let len = self.len();
        if index >= len {
            return Err(out_of_range!("index", index, len));
        }

        if let Backing::Owned(items) = &mut self.backing {
            return Ok(items.remove(index));
        }

        match (self.message(), &self.backing) {
            (Some(message), Backing::Synchronized { states, .. }) => {
                let part = message.body.remove_part(index)?;
                Ok(states.project(&part))
            }
            _ => Err(out_of_range!("index", index, 0)),
        }
    }

    /// Remove every parameter, a missing message stays missing
    pub fn clear(&mut self) {
        if let Backing::Owned(items) = &mut self.backing {
            items.clear();
        } else if let Some(message) = self.message() {
            message.body.clear_parts();
        }
    }

    /// Check if `descriptor` is part of this collection
    #[must_use]
    pub fn contains(&self, descriptor: &ParameterDescriptor) -> bool {
        self.index_of(descriptor).is_some()
    }

    /// Position of `descriptor`, compared by the identity of its part
    #[must_use]
    pub fn index_of(&self, descriptor: &ParameterDescriptor) -> Option<usize> {
        match &self.backing {
            Backing::Owned(items) => items.iter().position(|item| item.same_part(descriptor)),
            Backing::Synchronized { .. } => {
                let part = descriptor.live_part()?;
                self.message()?.body.index_of_part(&part)
            }
        }
    }

    /// Copy the parameters into `dest` starting at `start`
    ///
    /// Slots of `dest` after the copied parameters are set to `None`, so a destination sized
    /// for a larger collection never keeps stale entries.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `start > dest.len()` or the parameters do not
    /// fit into `dest[start..]`.
    pub fn copy_to(&self, dest: &mut [Option<ParameterDescriptor>], start: usize) -> Result<()> {
        if start > dest.len() {
            return Err(out_of_range!("start", start, dest.len()));
        }

        let items = self.to_vec();
        if items.len() > dest.len() - start {
            return Err(out_of_range!("start", start, dest.len()));
        }

        let (copied, rest) = dest[start..].split_at_mut(items.len());
        for (slot, item) in copied.iter_mut().zip(items) {
            *slot = Some(item);
        }
        rest.fill(None);
        Ok(())
    }

    /// Iterate the parameters
    ///
    /// The iterator reads the live state on every step: changes made while iterating are
    /// observed, and an iterator obtained before a change is not restarted.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            collection: self,
            index: 0,
        }
    }

    /// Snapshot of the current parameters
    #[must_use]
    pub fn to_vec(&self) -> Vec<ParameterDescriptor> {
        self.iter().collect()
    }

    fn message(&self) -> Option<MessageDescriptionRc> {
        match &self.backing {
            Backing::Owned(_) => None,
            Backing::Synchronized { operation, message, .. } => operation.message(*message),
        }
    }

    fn adopt(&self, descriptor: &ParameterDescriptor) {
        if let Backing::Synchronized { states, .. } = &self.backing {
            states.adopt(descriptor);
        }
    }

    /// The backing message, recreated with every missing slot before it
    ///
    /// Must only be called for synchronized collections.
    fn vivify(&self) -> MessageDescriptionRc {
        match &self.backing {
            Backing::Synchronized { operation, message, .. } => operation.ensure_message(*message),
            Backing::Owned(_) => unreachable!("free-standing collections own their elements"),
        }
    }
}

impl Default for ParameterCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over a [`ParameterCollection`]
pub struct Iter<'a> {
    collection: &'a ParameterCollection,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = ParameterDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.collection.get(self.index).ok()?;
        self.index += 1;
        Some(item)
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = ParameterDescriptor;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ParameterDescriptor> for ParameterCollection {
    fn from_iter<T: IntoIterator<Item = ParameterDescriptor>>(iter: T) -> Self {
        ParameterCollection {
            backing: Backing::Owned(iter.into_iter().collect()),
        }
    }
}
