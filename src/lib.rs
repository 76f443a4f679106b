//! Scabbard: compile-time dependency injection
//!
//! Reads class declarations, resolves the object graph they describe,
//! validates it and emits the classes that wire it at runtime. Core types
//! live in `scabbard-core` and are re-exported here.

pub use scabbard_core::{ClassName, Primitive, ScabbardError, ScabbardResult, Type};

/// Core module re-exported from scabbard-core.
pub mod core {
    pub use scabbard_core::core::*;

    /// Path module re-exported from scabbard-core.
    pub mod path {
        pub use scabbard_core::core::path::*;
    }
}

/// Host type model re-exported from scabbard-core.
pub mod types {
    pub use scabbard_core::types::*;
}

/// Configuration management.
pub mod config;

/// Declaration metadata input.
pub mod metadata;

/// Resolved object graph.
pub mod model;

/// Dependency injection infrastructure.
pub mod di;

/// Error reporting.
pub mod diagnostics;

/// Directed graphs and cycle detection.
pub mod graph;

/// Analysis of declarations into the object graph.
pub mod analysis;

/// Object graph validation.
pub mod validation;

/// Generated class shapes and emission.
pub mod generation;

/// The full compiler pipeline.
pub mod compiler;
