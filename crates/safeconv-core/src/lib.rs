//! Conversions that never fail outward.
//!
//! Every operation returns an [`Outcome`]: the computed value, or a
//! documented fallback of the same type together with a [`Diagnostic`]
//! naming the [`FailureCategory`] that caused it.

pub mod color;
pub mod divide;
pub mod error;
pub mod json_file;
pub mod outcome;
pub mod registry;
pub mod scalar;

pub use color::{Palette, Rgb, parse_color, parse_color_with};
pub use divide::safe_divide;
pub use error::{ConversionError, FailureCategory, Result};
pub use json_file::load_json_map;
pub use outcome::{Diagnostic, Outcome, describe_input};
pub use registry::ConverterRegistry;
pub use scalar::{to_bool, to_float, to_int};
