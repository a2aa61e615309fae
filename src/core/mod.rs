//! Core layer - fundamental types shared by the stage and the translator.
//!
//! This module provides:
//! - [`TimeCode`] / [`TimeMapping`] - Stage time and the seconds → time code mapping
//! - [`Interpolation`] - Primitive variable interpolation classes
//! - [`Diagnostics`] - The non-fatal warning channel
//! - zlib helpers used by binary layers

mod time_sampling;
mod sample;
mod diagnostics;
mod compression;

pub use time_sampling::{TimeCode, TimeMapping, DEFAULT_TIME_CODES_PER_SECOND};
pub use sample::Interpolation;
pub use diagnostics::{Diagnostics, Warning, DEFAULT_WARNING_CAPACITY};
pub use compression::{compress, decompress};
