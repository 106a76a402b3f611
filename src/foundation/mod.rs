//! Shared primitives: error type, pixel and size types, fixed-point helpers.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
