use thiserror::Error;

macro_rules! invalid_argument {
    // Single string version
    ($param:expr, $msg:expr) => {
        crate::Error::InvalidArgument {
            param: $param,
            message: $msg.to_string(),
        }
    };

    // Format string with arguments version
    ($param:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            param: $param,
            message: format!($fmt, $($arg)*),
        }
    };
}

macro_rules! out_of_range {
    ($param:expr, $index:expr, $len:expr) => {
        crate::Error::OutOfRange {
            param: $param,
            index: $index,
            len: $len,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is raised synchronously by the call that violated its contract. Nothing is
/// retried internally, and a failing mutation never leaves a partial change behind.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::InvalidArgument`] - An empty or otherwise invalid required input
/// - [`Error::OutOfRange`] - An index outside the valid bounds of a collection
///
/// ## Conversion Errors
/// - [`Error::ConversionMismatch`] - The runtime type of a value cannot be adapted to a converter
/// - [`Error::InvalidFormat`] - A string could not be parsed into a convertible type
///
/// # Examples
///
/// ```rust
/// use httpbind::{converter::ConverterRegistry, typesystem::{Value, WireType}, Error};
///
/// let converter = ConverterRegistry::global().value_converter(&WireType::I4);
/// match converter.convert(Value::Boolean(true)) {
///     Err(Error::ConversionMismatch { from, to }) => {
///         assert_eq!(from, "System.Boolean");
///         assert_eq!(to, "System.Int32");
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was empty or otherwise invalid.
    ///
    /// # Fields
    ///
    /// * `param` - The name of the offending parameter
    /// * `message` - Detailed description of what was wrong with it
    #[error("Invalid argument '{param}': {message}")]
    InvalidArgument {
        /// The name of the offending parameter
        param: &'static str,
        /// The message to be printed for the InvalidArgument error
        message: String,
    },

    /// An index was outside the valid bounds of a collection.
    ///
    /// For positional reads, replacements and removals the valid range is `0..len`; for
    /// insertions it is `0..=len`.
    #[error("Argument '{param}' is out of range - index {index}, length {len}")]
    OutOfRange {
        /// The name of the index parameter
        param: &'static str,
        /// The offending index
        index: usize,
        /// The length of the collection at the time of the call
        len: usize,
    },

    /// A value's runtime type cannot be adapted to the type a converter is bound to.
    #[error("Cannot convert a value of type '{from}' to type '{to}'")]
    ConversionMismatch {
        /// Full name of the source type
        from: String,
        /// Full name of the target type
        to: String,
    },

    /// A string could not be parsed into the target type.
    ///
    /// The target type does support string conversion, but this particular input is not a
    /// valid representation of it.
    #[error("The string '{input}' is not a valid '{to}' - {message}")]
    InvalidFormat {
        /// Full name of the target type
        to: String,
        /// The input that failed to parse
        input: String,
        /// Parser detail
        message: String,
    },
}
