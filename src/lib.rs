// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # httpbind
//!
//! Parameter binding and value conversion for HTTP service operations.
//!
//! `httpbind` sits between a dispatcher and the operations it invokes. It describes every
//! operation as a return value plus input and output parameters, and gives each of them a
//! converter that moves values between their declared type, related runtime types, strings
//! taken from a URI, and the generic wrappers that carry a payload plus its format.
//!
//! ## Features
//!
//! - **Type-driven conversion** - one shared converter per type, selected by the shape of the type
//! - **Live projections** - operation views that read and edit a shared operation description
//!   without ever copying it
//! - **Auto-vivification** - missing request or response messages are recreated on first write
//! - **Thread safe** - the converter registry is a lock-free concurrent cache
//!
//! ## Quick Start
//!
//! ```rust
//! use httpbind::prelude::*;
//!
//! let description = OperationBuilder::new("Calculate")
//!     .parameter("a", WireType::I4)
//!     .out_parameter("b", WireType::R8)
//!     .returns(WireType::STRING)
//!     .build()?;
//!
//! let operation = OperationDescriptor::from_description(description);
//! assert_eq!(operation.input_parameters().len(), 1);
//! assert_eq!(operation.output_parameters().len(), 1);
//!
//! let a = operation.input_parameters().get(0)?;
//! assert_eq!(a.value_converter().convert_from_string("42")?, Value::I4(42));
//! # Ok::<(), httpbind::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`typesystem`] - structural type identifiers ([`typesystem::WireType`]) and runtime values
//! - [`converter`] - the [`converter::ValueConverter`] variants and the process-wide
//!   [`converter::ConverterRegistry`]
//! - [`description`] - the transport-neutral operation description other components edit
//! - [`http`] - the HTTP view: [`http::OperationDescriptor`], [`http::ParameterCollection`] and
//!   [`http::ParameterDescriptor`]
//!
//! ## Logging
//!
//! The crate emits `tracing` events (converter creation at `trace`, message recreation and
//! descriptor derivation at `debug`) and never installs a subscriber.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types
pub mod prelude;

pub mod converter;
pub mod description;
pub mod http;
pub mod typesystem;

/// `httpbind` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `httpbind` Error type
///
/// The main error type for all operations in this crate. See [`crate::Error`] for the
/// individual variants.
pub use error::Error;

pub use converter::BindingConfig;
