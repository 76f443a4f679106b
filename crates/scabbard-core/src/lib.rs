//! Core types shared by the Scabbard compiler and its tooling.
//!
//! Holds the host type model, the crate-wide error type and platform paths.

pub mod core;
pub mod types;

pub use crate::core::{ScabbardError, ScabbardResult};
pub use crate::types::{ClassName, Primitive, Type};
