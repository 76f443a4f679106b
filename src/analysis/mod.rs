//! Analysis: from annotated declarations to the injection context

pub mod analyzer;
pub mod bindings;
pub mod bridges;
pub mod components;
pub mod factories;
pub mod helper;
pub mod injection_targets;
pub mod modules;

pub use analyzer::Analyzer;
pub use bindings::{BindingRegistry, BindingsAnalyzer};
pub use bridges::BridgeRegistry;
pub use components::ComponentsAnalyzer;
pub use factories::FactoriesAnalyzer;
pub use helper::{AnalyzerHelper, Member, ScopeRegistry};
pub use injection_targets::{InjectionTargets, InjectionTargetsAnalyzer};
pub use modules::{ModuleParser, ModuleRegistry, ParsedModule};
