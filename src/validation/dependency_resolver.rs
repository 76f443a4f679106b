//! Provided/required bookkeeping for one component chain

use crate::model::{Dependency, Module};
use std::collections::BTreeSet;

/// Tracks what a component chain provides and what it asks for
///
/// A child resolver starts from everything its parent provides but with no
/// requirements of its own, so each component only answers for what its own
/// modules require.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    provided: BTreeSet<Dependency>,
    required: BTreeSet<Dependency>,
}

impl DependencyResolver {
    /// `injector` is always provided; generated code can ask for the injector itself
    pub fn new(injector: Dependency) -> Self {
        let mut provided = BTreeSet::new();
        provided.insert(injector);
        Self {
            provided,
            required: BTreeSet::new(),
        }
    }

    /// Resolver for a subcomponent
    pub fn child(&self) -> Self {
        Self {
            provided: self.provided.clone(),
            required: BTreeSet::new(),
        }
    }

    pub fn add_provided(&mut self, dependency: Dependency) {
        self.provided.insert(dependency);
    }

    pub fn add_required(&mut self, dependency: Dependency) {
        self.required.insert(dependency);
    }

    /// Record a module's own providers, factories and bindings
    pub fn add_module(&mut self, module: &Module) {
        for provider in &module.providers {
            self.add_provided(provider.dependency().clone());
            for injectee in provider.provision_point.injectees() {
                self.add_required(injectee.dependency.clone());
            }
        }
        for factory in &module.factories {
            self.add_provided(factory.dependency());
            for point in &factory.provision_points {
                for injectee in point.injector_injectees() {
                    self.add_required(injectee.dependency.clone());
                }
            }
        }
        for binding in &module.bindings {
            self.add_provided(binding.ancestor.clone());
            self.add_required(binding.dependency.clone());
        }
    }

    pub fn is_provided(&self, dependency: &Dependency) -> bool {
        self.provided.contains(dependency)
    }

    pub fn provided(&self) -> impl Iterator<Item = &Dependency> {
        self.provided.iter()
    }

    /// Required minus provided, in dependency order
    pub fn get_unresolved_dependencies(&self) -> Vec<&Dependency> {
        self.required.difference(&self.provided).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scabbard_core::types::{ClassName, Type};

    fn dependency(name: &str) -> Dependency {
        Dependency::new(Type::parse(name).unwrap())
    }

    fn resolver() -> DependencyResolver {
        DependencyResolver::new(Dependency::of_class(
            ClassName::parse("io.scabbard.Injector").unwrap(),
        ))
    }

    #[test]
    fn test_required_minus_provided() {
        let mut resolver = resolver();
        resolver.add_provided(dependency("a.Foo"));
        resolver.add_required(dependency("a.Foo"));
        resolver.add_required(dependency("a.Bar"));
        resolver.add_required(dependency("io.scabbard.Injector"));

        assert_eq!(resolver.get_unresolved_dependencies(), vec![&dependency("a.Bar")]);
    }

    #[test]
    fn test_boxed_forms_resolve_each_other() {
        let mut resolver = resolver();
        resolver.add_provided(dependency("java.lang.Integer"));
        resolver.add_required(dependency("int"));
        assert!(resolver.get_unresolved_dependencies().is_empty());
    }

    #[test]
    fn test_child_inherits_provided_only() {
        let mut parent = resolver();
        parent.add_provided(dependency("a.Foo"));
        parent.add_required(dependency("a.Missing"));

        let mut child = parent.child();
        child.add_required(dependency("a.Foo"));
        assert!(child.is_provided(&dependency("a.Foo")));
        assert!(child.get_unresolved_dependencies().is_empty());
        assert_eq!(parent.get_unresolved_dependencies().len(), 1);
    }
}
