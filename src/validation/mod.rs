//! Validation of the analyzed graph
//!
//! Validation never mutates the `InjectionContext`. Problems go to the error
//! reporter and the final verdict is whether any error was reported.

pub mod dependency_resolver;
pub mod sanity_checker;
pub mod validator;

pub use dependency_resolver::DependencyResolver;
pub use sanity_checker::SanityChecker;
pub use validator::Validator;
