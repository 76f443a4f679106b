//! Collaborator seams of the compiler
//!
//! The pipeline talks to its inputs and outputs only through the traits in
//! [`traits`], so tests can run it entirely in memory.
//!
//! # Example (Production)
//! ```no_run
//! use scabbard::config::Config;
//! use scabbard::di::ServiceContainer;
//! use std::path::Path;
//!
//! # fn example() -> scabbard::core::ScabbardResult<()> {
//! let container = ServiceContainer::new(Config::default(), Path::new("metadata/"))?;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

pub use container::ServiceContainer;
pub use traits::{CodeEmitter, ErrorReporter, MetadataSource};
