//! Process-wide cache of value converters.
//!
//! The [`ConverterRegistry`] maps every [`WireType`] that is ever asked for to exactly one
//! shared converter. Converters are created on first request by inspecting the shape of the
//! type and are immutable once published, so lookups never block each other.
//!
//! # Thread Safety
//!
//! - Concurrent hash map (`DashMap`) as the only storage
//! - Atomic get-or-insert: racing lookups of the same type publish a single converter
//! - [`ConverterRegistry::prefetch`] resolves many types in parallel with `rayon`

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    converter::{
        BindingConfig, ContentConverter, EnumConverter, MessageConverter, PlainConverter,
        RawContentConverter, ValueConverterRc,
    },
    typesystem::{EnvelopeKind, WireType},
};

static GLOBAL: OnceLock<ConverterRegistry> = OnceLock::new();

/// Thread-safe, memoizing registry of [`crate::converter::ValueConverter`]s keyed by type
pub struct ConverterRegistry {
    config: BindingConfig,
    converters: DashMap<WireType, ValueConverterRc>,
}

impl ConverterRegistry {
    /// Create a new, empty registry
    ///
    /// ## Arguments
    /// * `config` - The configuration every converter of this registry is created with
    #[must_use]
    pub fn new(config: BindingConfig) -> Self {
        ConverterRegistry {
            config,
            converters: DashMap::new(),
        }
    }

    /// The process-wide registry, created on first use with [`BindingConfig::default`]
    pub fn global() -> &'static ConverterRegistry {
        GLOBAL.get_or_init(|| ConverterRegistry::new(BindingConfig::default()))
    }

    /// The configuration converters of this registry are created with
    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Get the converter for `wire_type`, creating it on first request
    ///
    /// Every call with a structurally equal type returns the same instance.
    ///
    /// ## Arguments
    /// * `wire_type` - The type to convert values into
    pub fn value_converter(&self, wire_type: &WireType) -> ValueConverterRc {
        if let Some(converter) = self.converters.get(wire_type) {
            return converter.value().clone();
        }

        self.converters
            .entry(wire_type.clone())
            .or_insert_with(|| self.create(wire_type))
            .value()
            .clone()
    }

    /// Resolve the converters of `types` in parallel
    ///
    /// Intended for startup, so later lookups of these types are plain cache hits.
    pub fn prefetch(&self, types: &[WireType]) {
        tracing::debug!(count = types.len(), "prefetching value converters");
        types.par_iter().for_each(|wire_type| {
            self.value_converter(wire_type);
        });
    }

    /// Number of cached converters
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if no converter has been created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn create(&self, wire_type: &WireType) -> ValueConverterRc {
        let converter: ValueConverterRc = match wire_type.as_envelope() {
            Some((EnvelopeKind::Response | EnvelopeKind::Request, _)) => {
                match MessageConverter::new(wire_type.clone()) {
                    Some(converter) => Arc::new(converter),
                    None => self.plain(wire_type),
                }
            }
            Some((EnvelopeKind::Content, _)) => {
                match ContentConverter::new(wire_type.clone(), self.config) {
                    Some(converter) => Arc::new(converter),
                    None => self.plain(wire_type),
                }
            }
            None if *wire_type == WireType::RawContent => Arc::new(RawContentConverter::new()),
            None => match EnumConverter::new(wire_type.clone(), self.config) {
                Some(converter) => Arc::new(converter),
                None => self.plain(wire_type),
            },
        };

        tracing::trace!(wire_type = %wire_type, converter = ?converter, "created value converter");
        converter
    }

    fn plain(&self, wire_type: &WireType) -> ValueConverterRc {
        Arc::new(PlainConverter::new(wire_type.clone(), self.config))
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        ConverterRegistry::new(BindingConfig::default())
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("config", &self.config)
            .field("converters", &self.converters.len())
            .finish()
    }
}
