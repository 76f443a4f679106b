//! Resolved object-provisioning graph
//!
//! Every entity here is created once during analysis and is read-only afterwards.

pub mod binding;
pub mod dependency;
pub mod factory;
pub mod injection;
pub mod module;
pub mod provision;

pub use binding::Binding;
pub use dependency::{Converter, Dependency, Injectee};
pub use factory::{Factory, FactoryInjectee, FactoryProvisionPoint};
pub use injection::{InjectionPoint, InjectionTarget};
pub use module::{Component, ImportPoint, Module, ModuleImport};
pub use provision::{Provider, ProvisionPoint, Scope};

use scabbard_core::types::ClassName;
use std::collections::HashSet;
use std::rc::Rc;

/// The complete resolved graph handed to validation and generation
#[derive(Debug, Clone, Default)]
pub struct InjectionContext {
    pub components: Vec<Component>,
    /// Types with field or method injection points
    pub injectable_targets: Vec<InjectionTarget>,
    /// Types with a single injectable constructor
    pub providable_targets: Vec<InjectionTarget>,
    pub factories: Vec<Factory>,
    pub bindings: Vec<Binding>,
}

impl InjectionContext {
    pub fn find_component(&self, component_type: &ClassName) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| &c.component_type == component_type)
    }

    pub fn root_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_root())
    }

    /// Every module reachable from any component, each once, in component order
    pub fn modules(&self) -> Vec<Rc<Module>> {
        let mut seen = HashSet::new();
        self.components
            .iter()
            .flat_map(Component::modules)
            .filter(|module| seen.insert(module.module_type.clone()))
            .collect()
    }

    pub fn is_providable(&self, target_type: &ClassName) -> bool {
        self.providable_targets
            .iter()
            .any(|t| &t.target_type == target_type)
    }
}
