//! Generation: class shapes for every artifact of a validated graph
//!
//! Generators are pure functions from the injection context to
//! [`shape::ClassShape`] values. Only [`generator::Generator::emit`] touches
//! the [`crate::di::CodeEmitter`].

pub mod bridges;
pub mod configurators;
pub mod context;
pub mod emitter;
pub mod factories;
pub mod generator;
pub mod key_registry;
pub mod lookup;
pub mod package_invaders;
pub mod providers;
pub mod shape;

pub use context::{GenerationContext, GenerationContextFactory, Key, KeyRegistry, PackageInvader};
pub use emitter::JsonCodeEmitter;
pub use generator::{GenerationPlan, Generator};
pub use shape::{ClassShape, FieldShape, MethodShape, Operation};
